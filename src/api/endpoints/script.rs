//! Grading-script validation.

use axum::Json;
use serde::{Deserialize, Serialize};

use crate::script::validate_python;

#[derive(Deserialize)]
pub struct ValidateScriptRequest {
    #[serde(default)]
    pub script: String,
}

/// Both outcomes are 200: validity is the payload, not a transport error.
#[derive(Serialize)]
pub struct ValidateScriptResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// `POST /api/validate_script`
pub async fn validate(Json(req): Json<ValidateScriptRequest>) -> Json<ValidateScriptResponse> {
    match validate_python(&req.script) {
        Ok(()) => Json(ValidateScriptResponse {
            valid: true,
            error: None,
        }),
        Err(err) => Json(ValidateScriptResponse {
            valid: false,
            error: Some(err.to_string()),
        }),
    }
}
