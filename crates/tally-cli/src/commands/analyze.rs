//! Analyze command implementation

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use tally_core::{analyze_csv, AnalysisSummary};
use tracing::debug;

use super::truncate;

/// Number of recurring descriptions shown in the text report
const RECURRING_SHOWN: usize = 5;

/// Run the pipeline over a CSV file
pub fn load_summary(file: &Path) -> Result<AnalysisSummary> {
    let csv_file =
        File::open(file).with_context(|| format!("Failed to open file: {}", file.display()))?;
    let summary = analyze_csv(BufReader::new(csv_file))
        .with_context(|| format!("Failed to analyze {}", file.display()))?;
    debug!(
        rows = summary.transaction_count(),
        months = summary.monthly_spending.len(),
        "Loaded summary"
    );
    Ok(summary)
}

pub fn cmd_analyze(file: &Path, json: bool) -> Result<()> {
    let summary = load_summary(file)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    print!("{}", render_summary(&summary, &file.display().to_string()));
    Ok(())
}

/// Human-readable report for a summary
pub fn render_summary(summary: &AnalysisSummary, source: &str) -> String {
    let mut out = String::new();
    let line = "   ─────────────────────────────────────────────────────────────";

    out.push('\n');
    out.push_str("📊 Spending Summary\n");
    out.push_str(&format!("   Source: {}\n", source));
    out.push_str(&format!(
        "   Transactions: {}\n",
        summary.transaction_count()
    ));
    out.push_str(line);
    out.push('\n');

    if summary.monthly_spending.is_empty() {
        out.push_str("   No spending found.\n");
    } else {
        out.push_str(&format!(
            "   Average monthly spending: {:.2}\n",
            summary.avg_monthly_spending
        ));
    }
    match summary.estimated_monthly_income {
        Some(income) => out.push_str(&format!("   Estimated monthly income: {:.2}\n", income)),
        None => out.push_str("   Estimated monthly income: n/a (no credit rows)\n"),
    }

    if !summary.monthly_spending.is_empty() {
        out.push('\n');
        out.push_str(&format!("   {:10} │ {:>12}\n", "Month", "Spent"));
        out.push_str("   ───────────┼─────────────\n");
        for (month, total) in &summary.monthly_spending {
            out.push_str(&format!("   {:10} │ {:>12.2}\n", month, total));
        }
    }

    if !summary.category_totals.is_empty() {
        out.push('\n');
        out.push_str(&format!("   {:15} │ {:>12}\n", "Category", "Spent"));
        out.push_str("   ────────────────┼─────────────\n");
        for (category, total) in &summary.category_totals {
            out.push_str(&format!("   {:15} │ {:>12.2}\n", category.as_str(), total));
        }
    }

    if !summary.recurring.is_empty() {
        out.push('\n');
        out.push_str("   Most frequent:\n");
        for (description, count) in summary.recurring.top(RECURRING_SHOWN) {
            out.push_str(&format!(
                "   {:>4}× {}\n",
                count,
                truncate(description, 50)
            ));
        }
    }

    out
}
