//! API router.
//!
//! All routes share one [`ApiContext`]. CORS mirrors the request origin
//! and allows credentials, matching the browser frontend this backend
//! serves.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

use crate::api::endpoints;
use crate::api::types::ApiContext;

pub fn api_router(ctx: ApiContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    Router::new()
        .route("/api/load_configs", get(endpoints::configs::load))
        .route("/api/save_config", post(endpoints::configs::save))
        .route("/api/validate_script", post(endpoints::script::validate))
        .route("/api/sample_docs", post(endpoints::docs::sample))
        .route("/api/export", post(endpoints::export::export))
        .route("/api/process_llm", post(endpoints::llm::process))
        .route(
            "/api/process_pipeline_llm",
            post(endpoints::llm::process_pipeline),
        )
        .route("/ping", get(endpoints::ping::ping))
        .with_state(ctx)
        .layer(cors)
}
