//! Goal command implementation

use std::path::Path;

use anyhow::{Context, Result};
use tally_core::{check_goal, GoalRequest, GoalResult};

use super::load_summary;

pub fn cmd_goal(
    file: &Path,
    amount: f64,
    months: i64,
    income: Option<f64>,
    json: bool,
) -> Result<()> {
    let result = evaluate_goal(file, amount, months, income)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", render_goal(&result, amount, months));
    }
    Ok(())
}

/// Analyze `file` and check the goal against it
pub fn evaluate_goal(
    file: &Path,
    amount: f64,
    months: i64,
    income: Option<f64>,
) -> Result<GoalResult> {
    let summary = load_summary(file)?;

    let mut request = GoalRequest::new(amount, months);
    request.monthly_income = income;

    check_goal(&request, Some(&summary)).context("Goal check failed")
}

pub fn render_goal(result: &GoalResult, amount: f64, months: i64) -> String {
    let mut out = String::new();

    out.push('\n');
    out.push_str(&format!("🎯 Goal: save {:.2} in {} month(s)\n", amount, months));
    out.push_str("   ─────────────────────────────────────────────────────────────\n");
    out.push_str(&format!(
        "   Current monthly savings: {:.2}\n",
        result.current_monthly_savings
    ));
    out.push_str(&format!(
        "   Needed monthly savings:  {:.2}\n",
        result.needed_monthly_savings
    ));
    match result.months_needed_at_current_rate {
        Some(m) => out.push_str(&format!("   Months at current rate:  {:.1}\n", m)),
        None => out.push_str("   Months at current rate:  never (no savings)\n"),
    }
    out.push('\n');
    if result.feasible {
        out.push_str("✅ Feasible\n");
    } else {
        out.push_str("⚠️  Not feasible at the current rate\n");
    }
    for suggestion in &result.suggestions {
        out.push_str(&format!("   • {}\n", suggestion));
    }

    out
}
