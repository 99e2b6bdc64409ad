//! OpenAI-style chat-completions binding.
//!
//! Wraps the `/v1/chat/completions` endpoint using [`reqwest`].  The API
//! key is read from `OPENAI_API_KEY`; a provider built without a key
//! reports itself unavailable and fails requests with a typed error
//! rather than panicking.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::ModelConfig;
use crate::provider::{ChatMessage, CompletionError, CompletionProvider};

/// Default API base URL; override with `OPENAI_BASE_URL` for proxies.
const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Fixed request timeout.  Generation calls routinely take tens of
/// seconds; anything past this is treated as a failed attempt.
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Chat-completions client for one model.
#[derive(Debug)]
pub struct OpenAiProvider {
    client: Option<reqwest::Client>,
    api_key: Option<String>,
    base_url: String,
    config: ModelConfig,
}

impl OpenAiProvider {
    /// Build a provider for `config`, reading `OPENAI_API_KEY` from the
    /// environment.
    pub fn from_env(config: ModelConfig) -> Self {
        let api_key = std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty());
        let base_url =
            std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let client = api_key.as_ref().map(|_| {
            reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default()
        });
        Self {
            client,
            api_key,
            base_url,
            config,
        }
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, CompletionError> {
        let (client, api_key) = match (&self.client, &self.api_key) {
            (Some(client), Some(key)) => (client, key),
            _ => return Err(CompletionError::ApiKeyMissing("OPENAI_API_KEY")),
        };

        let body = ChatRequest {
            model: self.config.name,
            messages,
            temperature: self.config.temperature.default,
            max_tokens: self.config.max_tokens,
        };

        let response = client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(CompletionError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|content| !content.is_empty())
            .ok_or_else(|| {
                CompletionError::EmptyResponse("no choices in completion response".to_string())
            })
    }

    fn is_available(&self) -> bool {
        self.client.is_some()
    }
}
