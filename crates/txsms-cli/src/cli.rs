//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// txsms - Turn bank SMS notifications into transaction records
#[derive(Parser)]
#[command(name = "txsms")]
#[command(about = "Bank SMS transaction extractor", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Message catalog file (defaults to the data-dir override, then the built-in catalog)
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the message API server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// Disable authentication on the write route (local development only)
        #[arg(long)]
        no_auth: bool,

        /// File holding the auth key (TXSMS_AUTH_KEY takes precedence)
        #[arg(long, default_value = "authkey.txt")]
        auth_key_file: PathBuf,
    },

    /// Parse a single message and print the record
    Parse {
        /// Message text (read from stdin if omitted)
        message: Option<String>,
    },

    /// List catalog templates in precedence order
    Catalog {
        /// Verify that every template sample is won by its own template
        #[arg(long)]
        check: bool,
    },
}
