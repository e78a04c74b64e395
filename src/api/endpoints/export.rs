//! Graded-report export.

use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::report;

#[derive(Deserialize)]
pub struct ExportRequest {
    #[serde(default)]
    pub graded: Vec<Value>,
}

/// `POST /api/export` — regenerate the report file and return it as an
/// HTML attachment. The file name is fixed; each export overwrites the
/// previous one.
pub async fn export(
    State(ctx): State<ApiContext>,
    Json(req): Json<ExportRequest>,
) -> Result<Response, ApiError> {
    let html = report::render_report(&req.graded);
    report::write_report(&ctx.report_dir, &html)
        .map_err(|e| ApiError::Internal(format!("Failed to write report: {e}")))?;

    let headers = [
        (header::CONTENT_TYPE, "text/html"),
        (
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"report.html\"",
        ),
    ];
    Ok((headers, html).into_response())
}
