//! Savings goal handler

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    Json,
};
use tracing::debug;

use tally_core::{GoalRequest, GoalResult};

use crate::{AppError, AppState};

/// POST /api/check_goal - Check a savings goal against the latest summary
///
/// An empty body is treated as `{}`, so every field takes its default.
pub async fn check_goal(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<GoalResult>, AppError> {
    let bytes = axum::body::to_bytes(request.into_body(), 1024 * 10)
        .await
        .map_err(|_| AppError::bad_request("Invalid request body"))?;
    let req: GoalRequest = if bytes.iter().all(u8::is_ascii_whitespace) {
        GoalRequest::default()
    } else {
        serde_json::from_slice(&bytes).map_err(|_| AppError::bad_request("Invalid JSON"))?
    };

    let snapshot = state.store.current();
    let result = tally_core::check_goal(&req, snapshot.as_ref().map(|s| &s.summary))
        .map_err(AppError::from_core)?;

    debug!(
        goal_amount = req.goal_amount,
        months = req.months,
        feasible = result.feasible,
        "Checked goal"
    );

    Ok(Json(result))
}
