//! Project configuration endpoints.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db::ProjectConfig;

#[derive(Serialize)]
pub struct LoadConfigsResponse {
    pub configs: Vec<ProjectConfig>,
}

/// `GET /api/load_configs` — all stored `{name, config}` pairs.
pub async fn load(State(ctx): State<ApiContext>) -> Result<Json<LoadConfigsResponse>, ApiError> {
    let configs = ctx.store.load_all_configs().await?;
    Ok(Json(LoadConfigsResponse { configs }))
}

#[derive(Deserialize)]
pub struct SaveConfigRequest {
    pub name: Option<String>,
    pub config: Option<Value>,
}

#[derive(Serialize)]
pub struct SaveConfigResponse {
    pub status: &'static str,
    pub name: String,
}

/// `POST /api/save_config` — upsert a configuration by name.
pub async fn save(
    State(ctx): State<ApiContext>,
    Json(req): Json<SaveConfigRequest>,
) -> Result<Json<SaveConfigResponse>, ApiError> {
    let (Some(name), Some(config)) = (req.name, req.config) else {
        return Err(ApiError::MissingField("Missing name or config"));
    };

    ctx.store.save_config(&name, &config).await?;
    Ok(Json(SaveConfigResponse {
        status: "saved",
        name,
    }))
}
