use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use datagenie::api::server;
use datagenie::api::types::ApiContext;
use datagenie::config::{self, Settings};
use datagenie::db::ProjectStore;
use datagenie::llm;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("DataGenie backend starting v{}", config::APP_VERSION);

    let settings = Settings::from_env();
    if let Err(err) = run(settings).await {
        tracing::error!("Fatal: {err}");
        std::process::exit(1);
    }
}

async fn run(settings: Settings) -> Result<(), String> {
    let store = ProjectStore::connect(&settings.mongo_uri)
        .await
        .map_err(|e| format!("Invalid MONGO_URI: {e}"))?;
    let generator = llm::client_from_settings(&settings);
    tracing::info!(backend = %settings.llm_backend, "text generation backend selected");

    let ctx = ApiContext::new(Arc::new(store), generator, settings.report_dir.clone());

    let addr: SocketAddr = format!("{}:{}", settings.host, settings.port)
        .parse()
        .map_err(|e| format!("Invalid HOST/PORT: {e}"))?;

    let mut api_server = server::start(ctx, addr).await?;

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| format!("Failed to listen for shutdown signal: {e}"))?;
    tracing::info!("Shutdown requested");
    api_server.shutdown();

    Ok(())
}
