//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};
use tally_core::AnalysisStore;

pub async fn cmd_serve(host: &str, port: u16, static_dir: Option<&Path>) -> Result<()> {
    println!("🚀 Starting Tally web server...");
    println!("   Listening: http://{}:{}", host, port);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }

    // Parse allowed CORS origins from environment (comma-separated)
    let origins_str = std::env::var("TALLY_ALLOWED_ORIGINS").unwrap_or_default();
    let allowed_origins = tally_server::parse_allowed_origins(&origins_str);
    if !allowed_origins.is_empty() {
        println!(
            "   🌐 CORS origins: {} (TALLY_ALLOWED_ORIGINS)",
            allowed_origins.join(", ")
        );
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let config = tally_server::ServerConfig {
        allowed_origins,
        ..Default::default()
    };

    let static_dir_str = static_dir
        .map(|p| {
            p.to_str()
                .with_context(|| format!("Static dir is not valid UTF-8: {}", p.display()))
        })
        .transpose()?;

    tally_server::serve_with_config(AnalysisStore::new(), host, port, static_dir_str, config)
        .await?;

    Ok(())
}
