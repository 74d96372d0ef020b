//! Shared utilities for commands

use std::path::Path;

use anyhow::{Context, Result};
use txsms_core::{Catalog, SmsParser};

/// Load the catalog from an explicit path, the data-dir override, or the built-in copy
pub fn load_catalog(path: Option<&Path>) -> Result<Catalog> {
    match path {
        Some(p) => Catalog::load(Some(p))
            .with_context(|| format!("Failed to load catalog {}", p.display())),
        None => Catalog::load(None).context("Failed to load catalog"),
    }
}

/// Build a parser over the resolved catalog, using the wall clock
pub fn load_parser(path: Option<&Path>) -> Result<SmsParser> {
    let catalog = load_catalog(path)?;
    SmsParser::new(catalog).context("Failed to initialize parser")
}
