//! Tally CLI - Personal-finance transaction analysis
//!
//! Usage:
//!   tally analyze --file CSV                    Summarize spending
//!   tally goal --file CSV --amount N --months M Check a savings goal
//!   tally serve --port 3000                     Start web server

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
        Commands::Analyze { file, json } => commands::cmd_analyze(&file, json),
        Commands::Goal {
            file,
            amount,
            months,
            income,
            json,
        } => commands::cmd_goal(&file, amount, months, income, json),
        Commands::Serve {
            port,
            host,
            static_dir,
        } => commands::cmd_serve(&host, port, static_dir.as_deref()).await,
    }
}
