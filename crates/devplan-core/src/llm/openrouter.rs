//! OpenRouter chat-completions client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::trait_def::{GenerateError, TextGenerator};
use crate::plan::prompts::SYSTEM_MESSAGE;

/// Connection and sampling settings for [`OpenRouterClient`].
#[derive(Debug, Clone)]
pub struct OpenRouterConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
}

impl OpenRouterConfig {
    /// Chat-completions endpoint used when none is configured.
    pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
    /// Model used when none is configured.
    pub const DEFAULT_MODEL: &str = "google/gemini-2.0-pro-exp-02-05:free";
    pub const DEFAULT_TEMPERATURE: f32 = 0.7;

    /// Config with the default endpoint and temperature.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: Self::DEFAULT_BASE_URL.to_owned(),
            temperature: Self::DEFAULT_TEMPERATURE,
        }
    }
}

/// [`TextGenerator`] backed by OpenRouter.
pub struct OpenRouterClient {
    http: reqwest::Client,
    config: OpenRouterConfig,
}

impl OpenRouterClient {
    pub fn new(config: OpenRouterConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn request_body<'a>(&'a self, prompt: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_MESSAGE,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.config.temperature,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Pretty-print a JSON error payload; keep anything else verbatim.
fn error_details(body: String) -> String {
    match serde_json::from_str::<Value>(&body) {
        Ok(value) => serde_json::to_string_pretty(&value).unwrap_or(body),
        Err(_) => body,
    }
}

/// Trimmed content of the first choice.
fn first_choice(response: ChatResponse) -> Result<String, GenerateError> {
    let choice = response.choices.into_iter().next().ok_or_else(|| {
        GenerateError::MalformedResponse("'choices' field missing".to_owned())
    })?;
    Ok(choice.message.content.unwrap_or_default().trim().to_owned())
}

#[async_trait]
impl TextGenerator for OpenRouterClient {
    fn name(&self) -> &str {
        "openrouter"
    }

    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        debug!(
            model = %self.config.model,
            temperature = self.config.temperature,
            prompt_len = prompt.len(),
            "invoking openrouter"
        );

        let response = self
            .http
            .post(&self.config.base_url)
            .bearer_auth(&self.config.api_key)
            .json(&self.request_body(prompt))
            .send()
            .await
            .map_err(|source| GenerateError::Transport {
                url: self.config.base_url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), "openrouter returned an error");
            return Err(GenerateError::Status {
                status: status.as_u16(),
                body: error_details(body),
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| GenerateError::MalformedResponse(e.to_string()))?;
        first_choice(parsed)
    }
}
