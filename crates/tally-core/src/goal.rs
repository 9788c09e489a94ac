//! Savings goal feasibility check against an analysis summary

use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{AnalysisSummary, GoalRequest, GoalResult};

/// Maximum number of category reduction suggestions
pub const SUGGESTION_LIMIT: usize = 3;

/// Share of a category's total suggested as a cut
pub const REDUCTION_RATE: f64 = 0.10;

pub const ON_TRACK_MESSAGE: &str = "You're on track! Keep saving consistently.";

/// Check whether a savings goal is reachable at the current savings rate.
///
/// Income resolution order: the request's `monthly_income`, then the
/// summary's estimated income. With neither, returns
/// [`Error::IncomeRequired`]. A missing summary behaves like an empty one.
pub fn check_goal(request: &GoalRequest, summary: Option<&AnalysisSummary>) -> Result<GoalResult> {
    validate(request)?;

    let income = request
        .monthly_income
        .or_else(|| summary.and_then(|s| s.estimated_monthly_income))
        .ok_or(Error::IncomeRequired)?;
    let avg_spending = summary.map(|s| s.avg_monthly_spending).unwrap_or(0.0);

    let current = (income - avg_spending).max(0.0);
    let needed = request.goal_amount / request.months as f64;
    let feasible = current >= needed;
    let months_needed = if current > 0.0 {
        Some(round_to(request.goal_amount / current, 1))
    } else {
        None
    };

    let suggestions = if feasible {
        vec![ON_TRACK_MESSAGE.to_string()]
    } else {
        summary
            .map(|s| {
                s.top_categories(SUGGESTION_LIMIT)
                    .iter()
                    .map(|(category, total)| {
                        format!(
                            "Reduce {} by 10% (≈ ₹{:.2})",
                            category,
                            round_to(total * REDUCTION_RATE, 2)
                        )
                    })
                    .collect()
            })
            .unwrap_or_default()
    };

    debug!(
        income,
        avg_spending,
        current,
        needed,
        feasible,
        "Checked savings goal"
    );

    Ok(GoalResult {
        feasible,
        current_monthly_savings: round_to(current, 2),
        needed_monthly_savings: round_to(needed, 2),
        months_needed_at_current_rate: months_needed,
        suggestions,
    })
}

fn validate(request: &GoalRequest) -> Result<()> {
    if request.months < 1 {
        return Err(Error::InvalidGoal("months must be at least 1".into()));
    }
    if !request.goal_amount.is_finite() || request.goal_amount < 0.0 {
        return Err(Error::InvalidGoal(
            "goal_amount must be a non-negative number".into(),
        ));
    }
    if let Some(income) = request.monthly_income {
        if !income.is_finite() {
            return Err(Error::InvalidGoal("monthly_income must be a number".into()));
        }
    }
    Ok(())
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
