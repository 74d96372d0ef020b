//! txsms CLI - Bank SMS transaction extractor
//!
//! Usage:
//!   txsms serve --port 8080         Start the message API
//!   txsms parse "INR 232.42 ..."    Parse a single message
//!   txsms catalog --check           List and verify message templates

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Serve {
            host,
            port,
            no_auth,
            auth_key_file,
        } => {
            commands::cmd_serve(
                cli.catalog.as_deref(),
                &host,
                port,
                no_auth,
                &auth_key_file,
            )
            .await
        }
        Commands::Parse { message } => {
            commands::cmd_parse(cli.catalog.as_deref(), message.as_deref())
        }
        Commands::Catalog { check } => commands::cmd_catalog(cli.catalog.as_deref(), check),
    }
}
