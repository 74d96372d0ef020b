//! Parse command implementation

use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;
use txsms_core::{Outcome, SmsParser};

use super::load_parser;

pub fn cmd_parse(catalog: Option<&Path>, message: Option<&str>) -> Result<()> {
    let parser = load_parser(catalog)?;
    let text = read_message(message, io::stdin().lock())?;
    debug!(len = text.len(), "Parsing message");
    parse_and_print(&parser, &text)
}

/// Use the argument if given, otherwise read the whole reader
pub fn read_message<R: Read>(message: Option<&str>, mut reader: R) -> Result<String> {
    if let Some(m) = message {
        return Ok(m.to_string());
    }

    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .context("Failed to read message from stdin")?;
    Ok(text.trim_end_matches(['\r', '\n']).to_string())
}

pub fn parse_and_print(parser: &SmsParser, text: &str) -> Result<()> {
    match parser.parse(text) {
        Ok(Outcome::NotFinancial) => {
            println!("ℹ️  Not a bank notification (ignored)");
            Ok(())
        }
        Ok(Outcome::Transaction { record, date_error }) => {
            println!("{}", serde_json::to_string_pretty(&record)?);
            if let Some(e) = date_error {
                eprintln!("⚠️  {} (time set to now)", e);
            }
            Ok(())
        }
        Err(e) => {
            let diagnostic = e.diagnostic();
            Err(anyhow::Error::new(e).context(diagnostic))
        }
    }
}
