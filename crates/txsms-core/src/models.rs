//! Domain models for txsms

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Semantic fields a message template can capture
///
/// The lowercase name is the capture-group name used in template patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Amount,
    TxType,
    Account,
    Date,
    Time,
    Receiver,
    Balance,
    Sender,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Amount => "amount",
            Self::TxType => "txtype",
            Self::Account => "account",
            Self::Date => "date",
            Self::Time => "time",
            Self::Receiver => "receiver",
            Self::Balance => "balance",
            Self::Sender => "sender",
        }
    }

    /// Get all fields
    pub fn all() -> &'static [Field] {
        &[
            Self::Amount,
            Self::TxType,
            Self::Account,
            Self::Date,
            Self::Time,
            Self::Receiver,
            Self::Balance,
            Self::Sender,
        ]
    }
}

impl std::str::FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| format!("Unknown field: {}", s))
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Direction of money movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxType {
    Debit,
    Credit,
}

impl TxType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debit => "Debit",
            Self::Credit => "Credit",
        }
    }
}

impl std::fmt::Display for TxType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A transaction extracted from a bank notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    #[serde(rename = "type")]
    pub tx_type: TxType,
    /// Bank token that identified the message (e.g. "ICICI")
    pub bank: String,
    /// Masked card/account fragment, empty if not captured
    pub account: String,
    pub amount: f64,
    pub sender: String,
    pub receiver: String,
    /// Available balance or limit, 0 if not captured
    pub balance: f64,
    /// Transaction time in the reference zone (fallback "now" if unparsable)
    #[serde(rename = "time")]
    pub date_time: DateTime<FixedOffset>,
}
