use std::env;
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "datagenie";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_MONGO_URI: &str = "mongodb://localhost/datagenie";
/// Database holding project configurations.
pub const DEFAULT_DATABASE: &str = "datagenie";
/// Collection holding project configurations.
pub const PROJECTS_COLLECTION: &str = "projects";
/// Collection sampled when the caller names none.
pub const DEFAULT_SAMPLE_COLLECTION: &str = "projects";
/// Row cap appended to sampling pipelines that carry no `$limit` of their own.
pub const DEFAULT_SAMPLE_LIMIT: i64 = 10;

pub fn default_log_filter() -> String {
    format!("{APP_NAME}=info,tower_http=info")
}

/// Process configuration, resolved once at startup and injected into the
/// gateways. Nothing reads the environment after this point.
#[derive(Debug, Clone)]
pub struct Settings {
    pub mongo_uri: String,
    pub llm_backend: String,
    pub ollama_url: String,
    pub ollama_model: String,
    pub azure_endpoint: Option<String>,
    pub azure_api_version: Option<String>,
    pub azure_model: Option<String>,
    pub azure_api_key: Option<String>,
    pub host: String,
    pub port: u16,
    /// Directory the exported report is written into.
    pub report_dir: PathBuf,
}

impl Settings {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            mongo_uri: env_or("MONGO_URI", defaults.mongo_uri),
            llm_backend: env_or("LLM_BACKEND", defaults.llm_backend),
            ollama_url: env_or("OLLAMA_URL", defaults.ollama_url),
            ollama_model: env_or("OLLAMA_MODEL", defaults.ollama_model),
            azure_endpoint: env::var("AZURE_OPENAI_ENDPOINT").ok(),
            azure_api_version: env::var("AZURE_OPENAI_VERSION").ok(),
            azure_model: env::var("AZURE_OPENAI_MODEL").ok(),
            azure_api_key: env::var("AZURE_OPENAI_API_KEY").ok(),
            host: env_or("HOST", defaults.host),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            report_dir: env::var("REPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.report_dir),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mongo_uri: DEFAULT_MONGO_URI.to_string(),
            llm_backend: "ollama".to_string(),
            ollama_url: "http://localhost:11434/api/generate".to_string(),
            ollama_model: "mistral:7b-instruct".to_string(),
            azure_endpoint: None,
            azure_api_version: None,
            azure_model: None,
            azure_api_key: None,
            host: "127.0.0.1".to_string(),
            port: 5000,
            report_dir: PathBuf::from("."),
        }
    }
}

fn env_or(key: &str, default: String) -> String {
    env::var(key).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_services() {
        let settings = Settings::default();
        assert_eq!(settings.mongo_uri, "mongodb://localhost/datagenie");
        assert_eq!(settings.llm_backend, "ollama");
        assert_eq!(settings.ollama_url, "http://localhost:11434/api/generate");
        assert_eq!(settings.ollama_model, "mistral:7b-instruct");
        assert_eq!(settings.port, 5000);
        assert!(settings.azure_endpoint.is_none());
    }

    // Single test for all env interactions: tests run in parallel threads
    // and PORT/LLM_BACKEND must not be mutated from two tests at once.
    #[test]
    fn from_env_overrides_and_falls_back() {
        env::set_var("LLM_BACKEND", "azure");
        env::set_var("PORT", "8080");
        let settings = Settings::from_env();
        assert_eq!(settings.llm_backend, "azure");
        assert_eq!(settings.port, 8080);

        env::set_var("PORT", "not-a-port");
        let settings = Settings::from_env();
        assert_eq!(settings.port, 5000);

        env::remove_var("LLM_BACKEND");
        env::remove_var("PORT");
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }
}
