//! Text Generation Client
//!
//! `TextGenerator` is the seam the composer talks to; `OpenAiChatClient`
//! speaks the OpenAI-compatible chat completions API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::types::{ChatPrompt, GenerationOutcome, LetterError};
use crate::logic::config::LetterConfig;

#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Short identifier for logs
    fn name(&self) -> &str;

    async fn generate(&self, prompt: &ChatPrompt) -> GenerationOutcome;
}

/// Generator that never calls out; every letter comes from the template
pub struct OfflineGenerator;

#[async_trait]
impl TextGenerator for OfflineGenerator {
    fn name(&self) -> &str {
        "offline"
    }

    async fn generate(&self, _prompt: &ChatPrompt) -> GenerationOutcome {
        GenerationOutcome::Failure(LetterError::NotConfigured)
    }
}

// Request/Response types

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// OpenAI-compatible chat completions client
pub struct OpenAiChatClient {
    config: LetterConfig,
    http_client: reqwest::Client,
}

impl OpenAiChatClient {
    pub fn new(config: LetterConfig) -> Result<Self, LetterError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LetterError::Client(e.to_string()))?;

        Ok(Self { config, http_client })
    }

    pub fn config(&self) -> &LetterConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.api_base.trim_end_matches('/'))
    }

    async fn request(&self, prompt: &ChatPrompt) -> Result<String, LetterError> {
        let api_key = self.config.api_key.as_deref().ok_or(LetterError::NotConfigured)?;

        let body = ChatCompletionRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage { role: "system", content: &prompt.system },
                ChatMessage { role: "user", content: &prompt.user },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        log::debug!("Requesting letter from {} ({})", self.endpoint(), self.config.model);

        let response = self
            .http_client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status.as_u16(), body));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| LetterError::MalformedResponse(e.to_string()))?;

        first_content(parsed)
    }

    fn transport_error(&self, e: reqwest::Error) -> LetterError {
        if e.is_timeout() {
            LetterError::Timeout(Duration::from_secs(self.config.timeout_secs))
        } else {
            LetterError::Network(e.to_string())
        }
    }
}

#[async_trait]
impl TextGenerator for OpenAiChatClient {
    fn name(&self) -> &str {
        &self.config.model
    }

    async fn generate(&self, prompt: &ChatPrompt) -> GenerationOutcome {
        self.request(prompt).await.into()
    }
}

fn status_error(status: u16, body: String) -> LetterError {
    match status {
        401 | 403 => LetterError::Auth(status),
        429 => LetterError::RateLimited,
        _ => LetterError::Status { status, body },
    }
}

fn first_content(response: ChatCompletionResponse) -> Result<String, LetterError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| LetterError::MalformedResponse("no message content".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompt() -> ChatPrompt {
        ChatPrompt {
            system: "system".to_string(),
            user: "user".to_string(),
        }
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_error(401, String::new()), LetterError::Auth(401));
        assert_eq!(status_error(403, String::new()), LetterError::Auth(403));
        assert_eq!(status_error(429, String::new()), LetterError::RateLimited);
        assert_eq!(
            status_error(500, "boom".to_string()),
            LetterError::Status { status: 500, body: "boom".to_string() }
        );
    }

    #[test]
    fn test_first_content() {
        let ok: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"Dear Jane"}}]}"#,
        )
        .unwrap();
        assert_eq!(first_content(ok).unwrap(), "Dear Jane");

        let empty: ChatCompletionResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(first_content(empty), Err(LetterError::MalformedResponse(_))));

        let null: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert!(matches!(first_content(null), Err(LetterError::MalformedResponse(_))));
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = OpenAiChatClient::new(LetterConfig {
            api_base: "http://localhost:9000/v1/".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(client.endpoint(), "http://localhost:9000/v1/chat/completions");
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_request() {
        let client = OpenAiChatClient::new(LetterConfig {
            api_base: "http://127.0.0.1:9".to_string(),
            api_key: None,
            ..Default::default()
        })
        .unwrap();

        assert_eq!(
            client.generate(&prompt()).await,
            GenerationOutcome::Failure(LetterError::NotConfigured)
        );
    }

    #[tokio::test]
    async fn test_unreachable_service_is_a_failure() {
        let client = OpenAiChatClient::new(LetterConfig {
            api_base: "http://127.0.0.1:9".to_string(),
            api_key: Some("test-key".to_string()),
            timeout_secs: 2,
            ..Default::default()
        })
        .unwrap();

        assert!(matches!(
            client.generate(&prompt()).await,
            GenerationOutcome::Failure(LetterError::Network(_) | LetterError::Timeout(_))
        ));
    }
}
