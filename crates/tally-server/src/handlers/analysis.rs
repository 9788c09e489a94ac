//! Upload and summary handlers

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::HeaderValue,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use tally_core::{analyze_with, read_transactions_csv};

use crate::{AppError, AppState, SuccessResponse};

/// Response header carrying the version of the returned summary
pub const ANALYSIS_VERSION_HEADER: &str = "x-analysis-version";

/// Result of a successful upload
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub version: u64,
    pub rows: usize,
    pub months: usize,
}

/// Only `.csv` files are accepted (extension compared case-insensitively)
pub fn allowed_file(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case("csv"))
}

/// POST /api/upload - Analyze a CSV export sent as multipart form data
pub async fn upload_csv(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let max_size = state.config.max_upload_size;
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(&format!("Failed to read form field: {}", e)))?
    {
        if field.name() != Some("file") || upload.is_some() {
            continue;
        }

        let filename = field.file_name().unwrap_or("").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|_| AppError::bad_request("Failed to read file data"))?;

        if bytes.len() > max_size {
            return Err(too_large(max_size));
        }

        upload = Some((filename, bytes.to_vec()));
    }

    let (filename, data) = upload.ok_or_else(|| AppError::bad_request("No file part"))?;
    analyze_upload(state, &filename, data).await
}

/// Request body for the JSON upload variant
#[derive(Debug, Deserialize)]
pub struct UploadJsonRequest {
    pub filename: String,
    /// Base64-encoded CSV content
    pub csv_data: String,
}

/// POST /api/upload/json - Analyze a base64-encoded CSV export
pub async fn upload_csv_json(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UploadJsonRequest>,
) -> Result<Json<UploadResponse>, AppError> {
    use base64::Engine;

    let data = base64::engine::general_purpose::STANDARD
        .decode(&req.csv_data)
        .map_err(|e| AppError::bad_request(&format!("Invalid base64 data: {}", e)))?;

    if data.len() > state.config.max_upload_size {
        return Err(too_large(state.config.max_upload_size));
    }

    analyze_upload(state, &req.filename, data).await
}

/// Validate the filename, run the pipeline and publish the result.
///
/// Parsing runs on the blocking pool. Nothing is published unless every
/// step succeeds.
pub async fn analyze_upload(
    state: Arc<AppState>,
    filename: &str,
    data: Vec<u8>,
) -> Result<Json<UploadResponse>, AppError> {
    if filename.is_empty() {
        return Err(AppError::bad_request("No selected file"));
    }
    if !allowed_file(filename) {
        return Err(AppError::bad_request("Invalid file"));
    }

    let worker_state = Arc::clone(&state);
    let summary = tokio::task::spawn_blocking(move || {
        read_transactions_csv(data.as_slice())
            .map(|table| analyze_with(&table, &worker_state.keywords))
    })
    .await?
    .map_err(AppError::from_core)?;
    let rows = summary.transaction_count();
    let months = summary.monthly_spending.len();

    let snapshot = state.store.publish(summary);
    info!(
        filename,
        rows,
        months,
        version = snapshot.version,
        "Analyzed upload"
    );

    Ok(Json(UploadResponse {
        version: snapshot.version,
        rows,
        months,
    }))
}

/// GET /api/summary - The latest published summary, or `{}` before any upload
pub async fn get_summary(State(state): State<Arc<AppState>>) -> Response {
    match state.store.current() {
        Some(snapshot) => {
            let mut response = Json(&snapshot.summary).into_response();
            response.headers_mut().insert(
                ANALYSIS_VERSION_HEADER,
                HeaderValue::from(snapshot.version),
            );
            response
        }
        None => Json(serde_json::json!({})).into_response(),
    }
}

/// DELETE /api/summary - Forget the published summary
pub async fn clear_summary(State(state): State<Arc<AppState>>) -> Json<SuccessResponse> {
    state.store.clear();
    info!("Cleared analysis snapshot");
    Json(SuccessResponse { success: true })
}

fn too_large(max_size: usize) -> AppError {
    AppError::bad_request(&format!(
        "File too large. Maximum size is {} MB",
        max_size / 1024 / 1024
    ))
}
