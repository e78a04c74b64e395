//! Ollama HTTP client for local LLM inference.

use std::time::Instant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{LlmClient, LlmError};

/// Request timeout for a single generation call. Local models can take a
/// while on first load; two minutes matches the upstream default.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

pub struct OllamaClient {
    endpoint: String,
    model: String,
    client: reqwest::Client,
    timeout_secs: u64,
}

impl OllamaClient {
    /// Create a client for the given generate endpoint (the full URL,
    /// e.g. `http://localhost:11434/api/generate`).
    pub fn new(endpoint: &str, model: &str, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            endpoint: endpoint.to_string(),
            model: model.to_string(),
            client,
            timeout_secs,
        }
    }
}

/// Request body for the generate endpoint. Streaming is disabled: callers
/// wait for the complete response.
#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let started = Instant::now();
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    LlmError::Connection(self.endpoint.clone())
                } else if e.is_timeout() {
                    LlmError::Timeout(self.timeout_secs)
                } else {
                    LlmError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Endpoint {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| LlmError::ResponseParsing(e.to_string()))?;

        tracing::info!(
            model = %self.model,
            elapsed_secs = started.elapsed().as_secs_f64(),
            "LLM generation call completed"
        );

        Ok(parsed.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructor_keeps_endpoint_and_model() {
        let client = OllamaClient::new("http://localhost:11434/api/generate", "mistral:7b-instruct", 120);
        assert_eq!(client.endpoint, "http://localhost:11434/api/generate");
        assert_eq!(client.model, "mistral:7b-instruct");
        assert_eq!(client.timeout_secs, 120);
    }

    #[test]
    fn request_body_disables_streaming() {
        let body = GenerateRequest {
            model: "mistral:7b-instruct",
            prompt: "hello",
            stream: false,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["stream"], false);
        assert_eq!(json["model"], "mistral:7b-instruct");
        assert_eq!(json["prompt"], "hello");
    }

    #[test]
    fn response_body_defaults_to_empty_text() {
        let parsed: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.response, "");
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_connection_error() {
        // Port 1 refuses connections immediately on any sane host.
        let client = OllamaClient::new("http://127.0.0.1:1/api/generate", "mistral:7b-instruct", 5);
        let err = client.generate("hello").await.unwrap_err();
        assert!(
            matches!(err, LlmError::Connection(_) | LlmError::HttpClient(_)),
            "unexpected error: {err:?}"
        );
    }
}
