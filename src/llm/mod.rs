//! Text generation gateway — one prompt in, raw text out.
//!
//! The backend is selected once from settings and injected; handlers never
//! consult the environment. There are no retries and no fallback between
//! backends: a failure on the selected backend is terminal for the request.

pub mod azure;
pub mod ollama;

pub use azure::AzureChatClient;
pub use ollama::OllamaClient;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::Settings;

/// Backend selector value for the local generation service.
pub const BACKEND_OLLAMA: &str = "ollama";
/// Backend selector value for the hosted chat-completion service.
pub const BACKEND_AZURE: &str = "azure";
/// Backend selector value reserved but not implemented.
pub const BACKEND_OPENAI: &str = "openai";

#[derive(Error, Debug, Clone)]
pub enum LlmError {
    #[error("Unknown LLM backend: {0}")]
    UnknownBackend(String),

    #[error("{0} backend not implemented yet")]
    NotImplemented(&'static str),

    #[error("Missing configuration: {0}")]
    MissingConfig(&'static str),

    #[error("LLM endpoint unreachable: {0}")]
    Connection(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("LLM returned error (status {status}): {body}")]
    Endpoint { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),
}

/// A text-generation backend: one prompt in, complete response text out.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

/// Build the client selected by `settings.llm_backend`.
///
/// Unknown or unimplemented selectors (and a misconfigured hosted backend)
/// yield an [`UnavailableBackend`] whose `generate` fails without touching
/// the network, so selection errors surface on the LLM routes rather than
/// preventing startup.
pub fn client_from_settings(settings: &Settings) -> Arc<dyn LlmClient> {
    match settings.llm_backend.as_str() {
        BACKEND_OLLAMA => Arc::new(OllamaClient::new(
            &settings.ollama_url,
            &settings.ollama_model,
            ollama::DEFAULT_TIMEOUT_SECS,
        )),
        BACKEND_AZURE => match AzureChatClient::from_settings(settings) {
            Ok(client) => Arc::new(client),
            Err(err) => Arc::new(UnavailableBackend::new(err)),
        },
        BACKEND_OPENAI => Arc::new(UnavailableBackend::new(LlmError::NotImplemented("OpenAI"))),
        other => Arc::new(UnavailableBackend::new(LlmError::UnknownBackend(
            other.to_string(),
        ))),
    }
}

/// Stand-in for a backend that cannot serve requests. Fails every call
/// with the recorded selection error, never touching the network.
pub struct UnavailableBackend {
    reason: LlmError,
}

impl UnavailableBackend {
    pub fn new(reason: LlmError) -> Self {
        Self { reason }
    }
}

#[async_trait]
impl LlmClient for UnavailableBackend {
    async fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
        Err(self.reason.clone())
    }
}

/// Mock client for handler tests — returns a canned response or failure.
pub struct MockLlmClient {
    result: Result<String, LlmError>,
}

impl MockLlmClient {
    pub fn new(response: &str) -> Self {
        Self {
            result: Ok(response.to_string()),
        }
    }

    pub fn failing(error: LlmError) -> Self {
        Self { result: Err(error) }
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
        self.result.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_with_backend(backend: &str) -> Settings {
        Settings {
            llm_backend: backend.to_string(),
            ..Settings::default()
        }
    }

    #[tokio::test]
    async fn mock_client_returns_configured_response() {
        let client = MockLlmClient::new("canned");
        assert_eq!(client.generate("prompt").await.unwrap(), "canned");
    }

    #[tokio::test]
    async fn unknown_backend_fails_without_network() {
        let client = client_from_settings(&settings_with_backend("gemini"));
        let err = client.generate("prompt").await.unwrap_err();
        assert_eq!(err.to_string(), "Unknown LLM backend: gemini");
    }

    #[tokio::test]
    async fn openai_backend_is_an_explicit_placeholder() {
        let client = client_from_settings(&settings_with_backend(BACKEND_OPENAI));
        let err = client.generate("prompt").await.unwrap_err();
        assert!(matches!(err, LlmError::NotImplemented("OpenAI")));
    }

    #[tokio::test]
    async fn azure_without_credentials_is_unavailable() {
        let client = client_from_settings(&settings_with_backend(BACKEND_AZURE));
        let err = client.generate("prompt").await.unwrap_err();
        assert!(matches!(err, LlmError::MissingConfig(_)));
    }

    #[tokio::test]
    async fn unavailable_backend_repeats_its_reason() {
        let client = UnavailableBackend::new(LlmError::UnknownBackend("x".into()));
        for _ in 0..2 {
            assert!(matches!(
                client.generate("p").await,
                Err(LlmError::UnknownBackend(_))
            ));
        }
    }
}
