//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Tally - See where the money goes
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Personal-finance transaction analysis", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a transaction CSV export
    Analyze {
        /// CSV file to analyze
        #[arg(short, long)]
        file: PathBuf,

        /// Print the full summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check whether a savings goal is reachable
    Goal {
        /// CSV file to analyze
        #[arg(short, long)]
        file: PathBuf,

        /// Amount to save
        #[arg(short, long)]
        amount: f64,

        /// Months to reach the goal
        #[arg(short, long, default_value = "1")]
        months: i64,

        /// Monthly income (estimated from credit rows if omitted)
        #[arg(short, long)]
        income: Option<f64>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Directory with static dashboard files
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },
}
