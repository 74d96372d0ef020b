//! Bank identification from message text

use regex::Regex;

use crate::error::{Error, Result};

/// Detects which bank, if any, sent a message
///
/// Tokens are matched literally and case-sensitively as one alternation:
/// the leftmost occurrence in the text wins, and a tie at the same position
/// goes to the token listed first.
#[derive(Debug, Clone)]
pub struct BankIdentifier {
    tokens: Vec<String>,
    matcher: Regex,
}

impl BankIdentifier {
    pub fn new<S: AsRef<str>>(tokens: &[S]) -> Result<Self> {
        let tokens: Vec<String> = tokens
            .iter()
            .map(|t| t.as_ref().trim().to_string())
            .collect();

        if tokens.is_empty() {
            return Err(Error::Catalog("no bank tokens configured".into()));
        }
        if let Some(empty) = tokens.iter().position(|t| t.is_empty()) {
            return Err(Error::Catalog(format!("bank token #{} is empty", empty + 1)));
        }

        let alternation = tokens
            .iter()
            .map(|t| regex::escape(t))
            .collect::<Vec<_>>()
            .join("|");
        let matcher = Regex::new(&alternation)?;

        Ok(Self { tokens, matcher })
    }

    /// Return the bank token found in `text`, or None if this is not a bank message
    pub fn identify<'a>(&self, text: &'a str) -> Option<&'a str> {
        self.matcher.find(text).map(|m| m.as_str())
    }

    /// Configured tokens in precedence order
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }
}
