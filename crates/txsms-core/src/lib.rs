//! txsms Core Library
//!
//! Shared functionality for extracting transactions from bank SMS:
//! - Bank identification from a fixed token list
//! - Ordered regex template catalog (first match wins)
//! - Normalizers for amounts, dates and transaction verbs
//! - Record assembly with a fatal/non-fatal error taxonomy
//! - Pluggable record storage

pub mod bank;
pub mod catalog;
pub mod error;
pub mod extract;
pub mod models;
pub mod normalize;
pub mod parser;
pub mod store;

pub use bank::BankIdentifier;
pub use catalog::{Catalog, CatalogSource, PrecedenceViolation, ViolationKind};
pub use error::{DateError, Error, ExtractError, Result};
pub use extract::{FieldMap, Template};
pub use models::{Field, TransactionRecord, TxType};
pub use normalize::{Clock, DateNormalizer, FixedClock, KindClassifier, SystemClock};
pub use parser::{Outcome, SmsParser};
pub use store::{MemoryStore, RecordStore};
