//! Record assembly
//!
//! Ties the pieces together for one message. Evaluation order is fixed:
//! bank, template, transaction type, amount, date-time, balance. The first
//! fatal failure stops assembly; a bad date only downgrades the timestamp.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::catalog::Catalog;
use crate::error::{DateError, ExtractError, Result};
use crate::models::{Field, TransactionRecord};
use crate::normalize::{parse_amount, Clock, DateNormalizer, SystemClock};

/// Result of parsing one message
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// No bank token in the message (OTPs, promotions, personal texts)
    NotFinancial,
    /// A record was assembled. `date_error` is set when the timestamp is the
    /// fallback "now" rather than the message's own date.
    Transaction {
        record: TransactionRecord,
        date_error: Option<DateError>,
    },
}

impl Outcome {
    pub fn record(&self) -> Option<&TransactionRecord> {
        match self {
            Self::NotFinancial => None,
            Self::Transaction { record, .. } => Some(record),
        }
    }
}

/// Parses bank notifications into transaction records
#[derive(Debug, Clone)]
pub struct SmsParser {
    catalog: Catalog,
    dates: DateNormalizer,
}

impl SmsParser {
    pub fn new(catalog: Catalog) -> Result<Self> {
        Self::with_clock(catalog, Arc::new(SystemClock))
    }

    /// Use a specific clock for missing times and date fallbacks
    pub fn with_clock(catalog: Catalog, clock: Arc<dyn Clock>) -> Result<Self> {
        let dates = DateNormalizer::new(catalog.zone(), clock)?;
        Ok(Self { catalog, dates })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn parse(&self, text: &str) -> std::result::Result<Outcome, ExtractError> {
        let Some(bank) = self.catalog.banks().identify(text) else {
            debug!("No bank token found, ignoring message");
            return Ok(Outcome::NotFinancial);
        };

        let fields = self.catalog.extract(text).ok_or_else(|| {
            debug!(bank, "No template matched");
            ExtractError::UnrecognizedFormat {
                bank: bank.to_string(),
            }
        })?;
        let template = fields.template();

        let verb = fields.get(Field::TxType);
        let tx_type = self
            .catalog
            .kinds()
            .classify(verb)
            .ok_or_else(|| ExtractError::UnclassifiedType(verb.to_string()))?;

        let amount_str = match fields.get(Field::Amount) {
            "" => {
                warn!(template, "Template did not capture an amount, using 0");
                "0"
            }
            s => s,
        };
        let amount = parse_amount(amount_str)
            .ok_or_else(|| ExtractError::AmountParse(amount_str.to_string()))?;

        let (date_time, date_error) = self
            .dates
            .parse_or_now(fields.get(Field::Date), fields.get(Field::Time));
        if let Some(e) = &date_error {
            warn!(template, error = %e, "Date parse error, using current time");
        }

        let balance_str = match fields.get(Field::Balance) {
            "" => "0",
            s => s,
        };
        let balance = parse_amount(balance_str)
            .ok_or_else(|| ExtractError::BalanceParse(balance_str.to_string()))?;

        let record = TransactionRecord {
            tx_type,
            bank: bank.to_string(),
            account: fields.get(Field::Account).to_string(),
            amount,
            sender: fields.get(Field::Sender).to_string(),
            receiver: fields.get(Field::Receiver).to_string(),
            balance,
            date_time,
        };

        debug!(
            template,
            bank = %record.bank,
            tx_type = %record.tx_type,
            amount = record.amount,
            "Assembled transaction"
        );

        Ok(Outcome::Transaction { record, date_error })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TxType;
    use crate::normalize::FixedClock;
    use chrono::{DateTime, FixedOffset, TimeZone, Utc};

    fn ist() -> FixedOffset {
        FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap()
    }

    fn clock_time() -> DateTime<FixedOffset> {
        ist().with_ymd_and_hms(2024, 6, 1, 9, 15, 42).unwrap()
    }

    fn parser_for(catalog: Catalog) -> SmsParser {
        let clock = FixedClock(clock_time().with_timezone(&Utc));
        SmsParser::with_clock(catalog, Arc::new(clock)).unwrap()
    }

    fn default_parser() -> SmsParser {
        parser_for(Catalog::embedded().unwrap())
    }

    fn custom_parser(pattern: &str) -> SmsParser {
        let toml = format!(
            r#"
utc_offset = "+05:30"
banks = ["Test"]

[verbs]
debit = ["spent"]
credit = ["received"]

[[templates]]
name = "custom"
bank = "Test"
pattern = '''{}'''
"#,
            pattern
        );
        parser_for(Catalog::from_toml(&toml).unwrap())
    }

    fn transaction(outcome: Outcome) -> (TransactionRecord, Option<DateError>) {
        match outcome {
            Outcome::Transaction { record, date_error } => (record, date_error),
            Outcome::NotFinancial => panic!("expected a transaction"),
        }
    }

    #[test]
    fn test_icici_card_spend() {
        let parser = default_parser();
        let outcome = parser
            .parse("INR 232.42 spent on ICICI Bank Card XX0000 on 04-Mar-23 at ONE97 COMMUNICA. Avl Lmt: INR 1,23,456.28. To dispute,call 18002662/SMS BLOCK 0000 to 9215676766")
            .unwrap();
        let (record, date_error) = transaction(outcome);

        assert!(date_error.is_none());
        assert_eq!(record.tx_type, TxType::Debit);
        assert_eq!(record.bank, "ICICI");
        assert_eq!(record.account, "XX0000");
        assert_eq!(record.amount, 232.42);
        assert_eq!(record.receiver, "ONE97 COMMUNICA");
        assert_eq!(record.sender, "");
        assert_eq!(record.balance, 123456.28);
        // No time in the message: clock minute on the message's date
        assert_eq!(
            record.date_time,
            ist().with_ymd_and_hms(2023, 3, 4, 9, 15, 0).unwrap()
        );
    }

    #[test]
    fn test_federal_credit_sets_sender() {
        let parser = default_parser();
        let outcome = parser
            .parse("Amit, you've received INR 9,000.00 in your Account XXXXXXXX1234. Woohoo! It was sent by 0111 on January 17, 2023. -Federal Bank")
            .unwrap();
        let (record, _) = transaction(outcome);

        assert_eq!(record.tx_type, TxType::Credit);
        assert_eq!(record.bank, "Federal");
        assert_eq!(record.amount, 9000.0);
        assert_eq!(record.sender, "0111");
        assert_eq!(record.balance, 0.0);
        assert_eq!(
            record.date_time,
            ist().with_ymd_and_hms(2023, 1, 17, 9, 15, 0).unwrap()
        );
    }

    #[test]
    fn test_otp_is_not_financial() {
        let parser = default_parser();
        let outcome = parser
            .parse("Your OTP for login is 482913. Do not share it with anyone.")
            .unwrap();
        assert_eq!(outcome, Outcome::NotFinancial);
        assert!(outcome.record().is_none());
    }

    #[test]
    fn test_known_bank_unknown_format() {
        let parser = default_parser();
        let result = parser.parse(
            "Rs.250 spent on HDFC Bank Food Card xx1234 at SWIGGY on 2023-03-01. Avl bal: Rs.1000",
        );
        assert_eq!(
            result,
            Err(ExtractError::UnrecognizedFormat {
                bank: "HDFC".to_string()
            })
        );
    }

    #[test]
    fn test_unclassified_verb() {
        let parser = custom_parser(r"Test (?P<txtype>\w+) INR (?P<amount>[\d.]+)");
        assert_eq!(
            parser.parse("Test refunded INR 10.00"),
            Err(ExtractError::UnclassifiedType("refunded".to_string()))
        );
    }

    #[test]
    fn test_amount_parse_error() {
        let parser = custom_parser(r"Test (?P<txtype>\w+) INR (?P<amount>\w+)");
        let err = parser.parse("Test spent INR abc").unwrap_err();
        assert_eq!(err, ExtractError::AmountParse("abc".to_string()));
        assert_eq!(err.diagnostic(), "Amount parsing error");
    }

    #[test]
    fn test_balance_parse_error() {
        let parser =
            custom_parser(r"Test (?P<txtype>\w+) INR (?P<amount>[\d.]+) bal (?P<balance>\S+)");
        assert_eq!(
            parser.parse("Test spent INR 10.00 bal n/a"),
            Err(ExtractError::BalanceParse("n/a".to_string()))
        );
    }

    #[test]
    fn test_amount_checked_before_balance() {
        let parser =
            custom_parser(r"Test (?P<txtype>\w+) INR (?P<amount>\S+) bal (?P<balance>\S+)");
        assert_eq!(
            parser.parse("Test spent INR x bal y"),
            Err(ExtractError::AmountParse("x".to_string()))
        );
    }

    #[test]
    fn test_missing_amount_defaults_to_zero() {
        let parser = custom_parser(r"Test (?P<txtype>\w+) on (?P<date>[\d-]+)");
        let (record, date_error) = transaction(parser.parse("Test spent on 07-03-2023").unwrap());
        assert_eq!(record.amount, 0.0);
        assert_eq!(record.balance, 0.0);
        assert!(date_error.is_none());
    }

    #[test]
    fn test_bad_date_falls_back_to_now() {
        let parser = custom_parser(r"Test (?P<txtype>\w+) INR (?P<amount>[\d.]+) on (?P<date>\S+)");
        let (record, date_error) =
            transaction(parser.parse("Test received INR 5.00 on 31-02-2023").unwrap());

        assert_eq!(record.tx_type, TxType::Credit);
        assert_eq!(record.amount, 5.0);
        assert_eq!(record.date_time, clock_time());
        assert!(matches!(date_error, Some(DateError::Unparsable(_))));
    }

    #[test]
    fn test_missing_date_falls_back_to_now() {
        let parser = custom_parser(r"Test (?P<txtype>\w+) INR (?P<amount>[\d.]+)");
        let (record, date_error) = transaction(parser.parse("Test spent INR 5.00").unwrap());
        assert_eq!(record.date_time, clock_time());
        assert_eq!(date_error, Some(DateError::NoDateFound(String::new())));
    }
}
