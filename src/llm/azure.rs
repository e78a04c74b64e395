//! Azure OpenAI chat-completion client.
//!
//! The prompt is wrapped as a single user turn after a fixed system
//! instruction. Sampling is pinned (temperature 0, top-p 1, bounded
//! output) so pipeline generation stays reproducible.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{LlmClient, LlmError};
use crate::config::Settings;

const SYSTEM_INSTRUCTION: &str = "You are a helpful assistant.";
const MAX_TOKENS: u32 = 2048;
const TEMPERATURE: f32 = 0.0;
const TOP_P: f32 = 1.0;

#[derive(Debug)]
pub struct AzureChatClient {
    endpoint: String,
    api_version: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
}

impl AzureChatClient {
    /// Build from settings; every Azure field is required.
    pub fn from_settings(settings: &Settings) -> Result<Self, LlmError> {
        let endpoint = settings
            .azure_endpoint
            .clone()
            .ok_or(LlmError::MissingConfig("AZURE_OPENAI_ENDPOINT"))?;
        let api_version = settings
            .azure_api_version
            .clone()
            .ok_or(LlmError::MissingConfig("AZURE_OPENAI_VERSION"))?;
        let model = settings
            .azure_model
            .clone()
            .ok_or(LlmError::MissingConfig("AZURE_OPENAI_MODEL"))?;
        let api_key = settings
            .azure_api_key
            .clone()
            .ok_or(LlmError::MissingConfig("AZURE_OPENAI_API_KEY"))?;

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_version,
            model,
            api_key,
            client: reqwest::Client::new(),
        })
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint, self.model, self.api_version
        )
    }
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
}

impl<'a> ChatRequest<'a> {
    fn for_prompt(prompt: &'a str) -> Self {
        Self {
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_INSTRUCTION,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            top_p: TOP_P,
        }
    }
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: String,
}

#[async_trait]
impl LlmClient for AzureChatClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let response = self
            .client
            .post(self.completions_url())
            .header("api-key", &self.api_key)
            .json(&ChatRequest::for_prompt(prompt))
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    LlmError::Connection(self.endpoint.clone())
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

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::ResponseParsing(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| LlmError::ResponseParsing("response contained no choices".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn azure_settings() -> Settings {
        Settings {
            llm_backend: "azure".into(),
            azure_endpoint: Some("https://example.openai.azure.com/".into()),
            azure_api_version: Some("2024-02-01".into()),
            azure_model: Some("gpt-4o".into()),
            azure_api_key: Some("secret".into()),
            ..Settings::default()
        }
    }

    #[test]
    fn completions_url_includes_deployment_and_version() {
        let client = AzureChatClient::from_settings(&azure_settings()).unwrap();
        assert_eq!(
            client.completions_url(),
            "https://example.openai.azure.com/openai/deployments/gpt-4o/chat/completions?api-version=2024-02-01"
        );
    }

    #[test]
    fn missing_endpoint_is_rejected() {
        let mut settings = azure_settings();
        settings.azure_endpoint = None;
        let err = AzureChatClient::from_settings(&settings).unwrap_err();
        assert!(matches!(err, LlmError::MissingConfig("AZURE_OPENAI_ENDPOINT")));
    }

    #[test]
    fn missing_api_key_is_rejected() {
        let mut settings = azure_settings();
        settings.azure_api_key = None;
        let err = AzureChatClient::from_settings(&settings).unwrap_err();
        assert!(matches!(err, LlmError::MissingConfig("AZURE_OPENAI_API_KEY")));
    }

    #[test]
    fn request_pins_sampling_parameters() {
        let body = serde_json::to_value(ChatRequest::for_prompt("build a pipeline")).unwrap();
        assert_eq!(body["max_tokens"], 2048);
        assert_eq!(body["temperature"], 0.0);
        assert_eq!(body["top_p"], 1.0);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], SYSTEM_INSTRUCTION);
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "build a pipeline");
    }

    #[test]
    fn response_parses_first_choice() {
        let parsed: ChatResponse = serde_json::from_str(
            r#"{"choices": [{"message": {"role": "assistant", "content": "[]"}}]}"#,
        )
        .unwrap();
        assert_eq!(parsed.choices[0].message.content, "[]");
    }
}
