//! Normalizers turning captured substrings into typed values
//!
//! - `amount` - grouped decimal strings to numbers
//! - `datetime` - multi-layout dates plus optional time to a zoned timestamp
//! - `kind` - transaction verbs to Debit/Credit

pub mod amount;
pub mod datetime;
pub mod kind;

pub use amount::parse_amount;
pub use datetime::{parse_utc_offset, Clock, DateNormalizer, FixedClock, SystemClock};
pub use kind::KindClassifier;
