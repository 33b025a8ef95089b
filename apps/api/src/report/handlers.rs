use std::sync::Arc;

use axum::{
    extract::State,
    http::header::{HeaderName, CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;

use crate::errors::AppError;
use crate::report::{
    generate_report, preview_report, ReportPreview, ReportRequest, MAX_TITLE_CHARS,
};
use crate::state::AppState;

const PAGE_COUNT_HEADER: HeaderName = HeaderName::from_static("x-page-count");

/// POST /api/v1/reports/pdf
pub async fn handle_export_pdf(
    State(state): State<AppState>,
    Json(req): Json<ReportRequest>,
) -> Result<Response, AppError> {
    validate_request(&req)?;

    let metrics = Arc::clone(&state.metrics);
    let page_config = state.page_config.clone();

    // Layout and serialization are CPU-bound; keep them off the executor.
    let output = tokio::task::spawn_blocking(move || {
        generate_report(&req, metrics.as_ref(), &page_config, Utc::now())
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in report export: {e}")))??;

    let headers = [
        (CONTENT_TYPE, "application/pdf".to_string()),
        (
            CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", output.filename),
        ),
        (PAGE_COUNT_HEADER, output.page_count.to_string()),
    ];
    Ok((headers, output.bytes).into_response())
}

/// POST /api/v1/reports/preview
pub async fn handle_preview(
    State(state): State<AppState>,
    Json(req): Json<ReportRequest>,
) -> Result<Json<ReportPreview>, AppError> {
    validate_request(&req)?;

    let metrics = Arc::clone(&state.metrics);
    let page_config = state.page_config.clone();

    let preview = tokio::task::spawn_blocking(move || {
        preview_report(&req, metrics.as_ref(), &page_config, Utc::now())
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in report preview: {e}")))??;

    Ok(Json(preview))
}

fn validate_request(req: &ReportRequest) -> Result<(), AppError> {
    if let Some(title) = &req.title {
        let len = title.chars().count();
        if len > MAX_TITLE_CHARS {
            return Err(AppError::Validation(format!(
                "title is {len} characters; the limit is {MAX_TITLE_CHARS}"
            )));
        }
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
