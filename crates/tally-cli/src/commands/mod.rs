//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `analyze` - Summarize a CSV export, plus the shared `load_summary`
//! - `goal` - Savings goal feasibility check
//! - `serve` - Web server command

pub mod analyze;
pub mod goal;
pub mod serve;

// Re-export command functions for main.rs
pub use analyze::*;
pub use goal::*;
pub use serve::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
