//! Gemini-style `generateContent` binding.
//!
//! The Gemini API has no separate system role in this shape, so system
//! messages are folded into a single instruction-prefixed prompt.  The
//! response MIME type is pinned to JSON because every caller in this
//! pipeline expects structured output.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::models::ModelConfig;
use crate::provider::{ChatMessage, CompletionError, CompletionProvider, Role};

/// Default API base URL; override with `GEMINI_BASE_URL`.
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Fixed request timeout, matching the OpenAI binding.
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

/// `generateContent` client for one model.
#[derive(Debug)]
pub struct GeminiProvider {
    client: Option<reqwest::Client>,
    api_key: Option<String>,
    base_url: String,
    config: ModelConfig,
}

impl GeminiProvider {
    /// Build a provider for `config`, reading `GOOGLE_API_KEY` from the
    /// environment.
    pub fn from_env(config: ModelConfig) -> Self {
        let api_key = std::env::var("GOOGLE_API_KEY").ok().filter(|k| !k.is_empty());
        let base_url =
            std::env::var("GEMINI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
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

    /// Fold an ordered message sequence into one prompt string.
    fn fold_messages(messages: &[ChatMessage]) -> String {
        let mut prompt = String::new();
        for message in messages {
            match message.role {
                Role::System => {
                    prompt.push_str("Instructions: ");
                    prompt.push_str(&message.content);
                    prompt.push_str("\n\n");
                }
                Role::User | Role::Assistant => {
                    prompt.push_str(&message.content);
                    prompt.push('\n');
                }
            }
        }
        prompt
    }
}

#[async_trait]
impl CompletionProvider for GeminiProvider {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, CompletionError> {
        let (client, api_key) = match (&self.client, &self.api_key) {
            (Some(client), Some(key)) => (client, key),
            _ => return Err(CompletionError::ApiKeyMissing("GOOGLE_API_KEY")),
        };

        let body = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": Self::fold_messages(messages) }],
            }],
            "generationConfig": {
                "temperature": self.config.temperature.default,
                "maxOutputTokens": self.config.max_tokens,
                "responseMimeType": "application/json",
            },
        });

        let response = client
            .post(format!(
                "{}/v1beta/models/{}:generateContent",
                self.base_url, self.config.name
            ))
            .header("x-goog-api-key", api_key)
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

        let parsed: GenerateResponse = response.json().await?;
        let Some(candidate) = parsed.candidates.into_iter().next() else {
            return Err(CompletionError::EmptyResponse(
                "no response candidates".to_string(),
            ));
        };

        let text = candidate
            .content
            .and_then(|c| c.parts.into_iter().find_map(|p| p.text))
            .filter(|t| !t.is_empty());

        match text {
            Some(text) => Ok(text),
            None => {
                let reason = candidate
                    .finish_reason
                    .unwrap_or_else(|| "UNKNOWN".to_string());
                let message = match reason.as_str() {
                    "SAFETY" => "content blocked by safety filters".to_string(),
                    "RECITATION" => "content blocked due to recitation".to_string(),
                    other => format!("no content generated, reason: {other}"),
                };
                Err(CompletionError::EmptyResponse(message))
            }
        }
    }

    fn is_available(&self) -> bool {
        self.client.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_messages_become_instruction_prefix() {
        let folded = GeminiProvider::fold_messages(&[
            ChatMessage::system("Return JSON only."),
            ChatMessage::user("A coffee app."),
        ]);
        assert!(folded.starts_with("Instructions: Return JSON only."));
        assert!(folded.contains("A coffee app."));
    }
}
