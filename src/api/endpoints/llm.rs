//! LLM endpoints: free-form document processing and natural-language
//! pipeline translation.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::api::types::ApiContext;
use crate::pipeline::{extract_pipeline, ExtractError};

#[derive(Deserialize)]
pub struct ProcessLlmRequest {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub doc: String,
}

/// `POST /api/process_llm` — run a user prompt against a document.
pub async fn process(State(ctx): State<ApiContext>, Json(req): Json<ProcessLlmRequest>) -> Response {
    let full_prompt = format!("Prompt: {}\nDocument: {}", req.prompt, req.doc);

    match ctx.llm.generate(&full_prompt).await {
        Ok(llm_result) => Json(json!({ "llm_result": llm_result })).into_response(),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": err.to_string(), "llm_result": "" })),
        )
            .into_response(),
    }
}

#[derive(Deserialize)]
pub struct ProcessPipelineRequest {
    #[serde(default)]
    pub description: String,
}

fn pipeline_prompt(description: &str) -> String {
    format!(
        "Translate the following description into a valid MongoDB aggregation pipeline in JSON. \
         Only output the JSON array. All key fields must be in double quotes. \
         Do not include any Markdown formatting, code blocks, or triple backticks. \
         Description: {description}"
    )
}

/// `POST /api/process_pipeline_llm` — translate a natural-language
/// description into an aggregation pipeline.
///
/// Extraction failures are 400s carrying the raw generator output
/// (`llm_error`) so the caller can recover or re-prompt by hand; backend
/// failures are 500s.
pub async fn process_pipeline(
    State(ctx): State<ApiContext>,
    Json(req): Json<ProcessPipelineRequest>,
) -> Response {
    let prompt = pipeline_prompt(&req.description);

    let response = match ctx.llm.generate(&prompt).await {
        Ok(response) => response,
        Err(err) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": err.to_string(), "pipeline": null })),
            )
                .into_response();
        }
    };

    match extract_pipeline(&response) {
        Ok(pipeline) => Json(json!({ "pipeline": pipeline })).into_response(),
        Err(err) => {
            tracing::warn!(description = %req.description, "pipeline extraction failed: {err}");
            match err {
                ExtractError::NotAnArray {
                    response,
                    extracted,
                } => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "Parsed JSON is not an array",
                        "llm_error": response,
                        "raw_pipeline": extracted,
                    })),
                )
                    .into_response(),
                ExtractError::Decode {
                    response,
                    extracted,
                    message,
                } => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": format!("JSON decode error: {message}"),
                        "llm_error": response,
                        "pipeline": null,
                        "raw_pipeline": extracted,
                    })),
                )
                    .into_response(),
                ExtractError::NoArrayFound { response } => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "No pipeline array found in LLM response",
                        "llm_error": response,
                        "pipeline": null,
                    })),
                )
                    .into_response(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_prompt_embeds_the_description() {
        let prompt = pipeline_prompt("find all users over 30");
        assert!(prompt.ends_with("Description: find all users over 30"));
        assert!(prompt.contains("Only output the JSON array."));
        assert!(prompt.contains("Do not include any Markdown formatting"));
    }
}
