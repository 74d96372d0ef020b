//! Error types for txsms
//!
//! `Error` covers configuration and startup failures. `ExtractError` is the
//! fatal half of the extraction taxonomy; `DateError` is the non-fatal half,
//! reported next to a record that still carries a fallback timestamp.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Catalog parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Invalid catalog: {0}")]
    Catalog(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Fatal extraction failures. No record is produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// A bank was identified but no template in the catalog fits
    #[error("Unrecognized {bank} message format")]
    UnrecognizedFormat { bank: String },

    /// The captured transaction verb is in neither the debit nor the credit set
    #[error("Unclassified transaction type: {0:?}")]
    UnclassifiedType(String),

    #[error("Unable to parse amount: {0:?}")]
    AmountParse(String),

    #[error("Unable to parse balance: {0:?}")]
    BalanceParse(String),
}

impl ExtractError {
    /// Short diagnostic suitable for an API response body
    pub fn diagnostic(&self) -> &'static str {
        match self {
            Self::UnrecognizedFormat { .. } => "Message format not recognized",
            Self::UnclassifiedType(_) => "Transaction type parsing error",
            Self::AmountParse(_) => "Amount parsing error",
            Self::BalanceParse(_) => "Balance amount parsing error",
        }
    }
}

/// Non-fatal date failures. The record keeps the fallback timestamp.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    #[error("No date found in {0:?}")]
    NoDateFound(String),

    #[error("Unable to parse date: {0:?}")]
    Unparsable(String),
}
