//! Transaction kind classification from the captured verb

use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::models::TxType;

/// Maps a captured verb ("spent", "debited", "received") to Debit or Credit
///
/// Lookup is exact and case-sensitive. The two sets must be disjoint.
#[derive(Debug, Clone)]
pub struct KindClassifier {
    debit: HashSet<String>,
    credit: HashSet<String>,
}

impl KindClassifier {
    pub fn new<S: AsRef<str>>(debit: &[S], credit: &[S]) -> Result<Self> {
        let debit: HashSet<String> = debit.iter().map(|v| v.as_ref().to_string()).collect();
        let credit: HashSet<String> = credit.iter().map(|v| v.as_ref().to_string()).collect();

        let mut overlap: Vec<&String> = debit.intersection(&credit).collect();
        if !overlap.is_empty() {
            overlap.sort();
            return Err(Error::Catalog(format!(
                "verbs listed as both debit and credit: {:?}",
                overlap
            )));
        }

        Ok(Self { debit, credit })
    }

    /// Classify a verb. None means unclassified.
    pub fn classify(&self, verb: &str) -> Option<TxType> {
        let mut kind = None;
        if self.debit.contains(verb) {
            kind = Some(TxType::Debit);
        }
        // Credit is checked last and wins; unreachable while the sets are disjoint
        if self.credit.contains(verb) {
            kind = Some(TxType::Credit);
        }
        kind
    }

    pub fn debit_verbs(&self) -> impl Iterator<Item = &str> {
        self.debit.iter().map(String::as_str)
    }

    pub fn credit_verbs(&self) -> impl Iterator<Item = &str> {
        self.credit.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> KindClassifier {
        KindClassifier::new(
            &["Spent", "spent", "debit", "debited", "from A/c"],
            &["received"],
        )
        .unwrap()
    }

    #[test]
    fn test_classify() {
        let kinds = classifier();
        assert_eq!(kinds.classify("spent"), Some(TxType::Debit));
        assert_eq!(kinds.classify("Spent"), Some(TxType::Debit));
        assert_eq!(kinds.classify("debited"), Some(TxType::Debit));
        assert_eq!(kinds.classify("from A/c"), Some(TxType::Debit));
        assert_eq!(kinds.classify("received"), Some(TxType::Credit));
    }

    #[test]
    fn test_unclassified() {
        let kinds = classifier();
        assert_eq!(kinds.classify("xyz"), None);
        assert_eq!(kinds.classify(""), None);
        // No stemming or case folding
        assert_eq!(kinds.classify("Received"), None);
        assert_eq!(kinds.classify("debits"), None);
    }

    #[test]
    fn test_overlapping_sets_rejected() {
        let result = KindClassifier::new(&["spent", "reversed"], &["reversed"]);
        match result {
            Err(Error::Catalog(msg)) => assert!(msg.contains("reversed")),
            other => panic!("expected catalog error, got {:?}", other),
        }
    }
}
