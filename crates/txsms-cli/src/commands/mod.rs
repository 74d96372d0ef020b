//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `catalog` - Catalog listing and precedence verification
//! - `core` - Shared utilities (catalog and parser loading)
//! - `parse` - Single-message parsing
//! - `serve` - Web server command

pub mod catalog;
pub mod core;
pub mod parse;
pub mod serve;

// Re-export command functions for main.rs
pub use catalog::*;
pub use core::*;
pub use parse::*;
pub use serve::*;
