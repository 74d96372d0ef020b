//! Server command implementation

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use txsms_core::MemoryStore;
use txsms_server::ServerConfig;

use super::load_parser;

pub async fn cmd_serve(
    catalog: Option<&Path>,
    host: &str,
    port: u16,
    no_auth: bool,
    auth_key_file: &Path,
) -> Result<()> {
    println!("🚀 Starting txsms server...");
    println!("   Listening: http://{}:{}", host, port);

    let parser = load_parser(catalog)?;
    println!(
        "   Catalog: {} ({} templates)",
        parser.catalog().source(),
        parser.catalog().templates().len()
    );

    let auth_key = if no_auth {
        println!();
        println!("   ⚠️  Authentication DISABLED - do not expose to network!");
        None
    } else {
        let key = txsms_server::load_auth_key(auth_key_file)?;
        println!("   🔑 Authentication: shared key on POST /v1/messages");
        Some(key)
    };
    println!("   📦 Storage: in-memory (records are lost on restart)");
    println!();
    println!("   Press Ctrl+C to stop");

    let config = ServerConfig {
        require_auth: !no_auth,
        auth_key,
    };

    txsms_server::serve_with_config(parser, Arc::new(MemoryStore::new()), host, port, config)
        .await
}
