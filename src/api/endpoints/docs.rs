//! Sample-document fetching.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::api::types::ApiContext;
use crate::config;

#[derive(Deserialize)]
pub struct SampleDocsRequest {
    pub mongo_uri: Option<String>,
    pub collection: Option<String>,
    pub pipeline: Option<Value>,
    pub limit: Option<i64>,
}

#[derive(Serialize)]
pub struct SampleDocsResponse {
    pub docs: Vec<Value>,
}

/// `POST /api/sample_docs` — run an aggregation and return up to `limit`
/// documents. Store failures respond 500 with the error message and an
/// empty `docs` list.
pub async fn sample(
    State(ctx): State<ApiContext>,
    Json(req): Json<SampleDocsRequest>,
) -> Response {
    let collection = req
        .collection
        .unwrap_or_else(|| config::DEFAULT_SAMPLE_COLLECTION.to_string());
    let limit = req.limit.unwrap_or(config::DEFAULT_SAMPLE_LIMIT);
    let pipeline = req.pipeline.unwrap_or(Value::Array(Vec::new()));

    match ctx
        .store
        .sample_documents(req.mongo_uri.as_deref(), &collection, &pipeline, limit)
        .await
    {
        Ok(docs) => Json(SampleDocsResponse { docs }).into_response(),
        Err(err) => {
            tracing::error!("sample_docs failed: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": err.to_string(), "docs": [] })),
            )
                .into_response()
        }
    }
}
