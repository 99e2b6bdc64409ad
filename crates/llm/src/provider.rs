//! Provider capability contracts.
//!
//! A [`CompletionProvider`] turns a chat message sequence into generated
//! text; an [`ImageProvider`] turns a prompt into image bytes.  Both are
//! owned per run and safe to call repeatedly; `close` releases any
//! client resources and must be safe to call after use.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Role of one chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One message of an ordered chat sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Errors from a completion provider.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    /// The provider's API key is not configured.
    #[error("API key not configured: {0}")]
    ApiKeyMissing(&'static str),

    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("completion request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("provider API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The provider answered 2xx but the payload carried no usable text
    /// (empty choices, safety block, truncation).
    #[error("empty completion: {0}")]
    EmptyResponse(String),

    /// The requested model has no registered provider.
    #[error("unsupported model: {0}")]
    UnsupportedModel(String),
}

impl CompletionError {
    /// Whether retrying the same request could plausibly succeed.
    ///
    /// Configuration problems (missing key, unsupported model) and
    /// empty-content responses are not retryable; transport failures and
    /// 429/5xx statuses are.
    pub fn is_retryable(&self) -> bool {
        match self {
            CompletionError::Request(_) => true,
            CompletionError::Api { status, .. } => *status == 429 || *status >= 500,
            CompletionError::ApiKeyMissing(_)
            | CompletionError::EmptyResponse(_)
            | CompletionError::UnsupportedModel(_) => false,
        }
    }
}

/// Text-generation capability.
#[async_trait]
pub trait CompletionProvider: Send + Sync + std::fmt::Debug {
    /// Generate a completion for an ordered message sequence.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, CompletionError>;

    /// Whether the provider is properly configured.
    fn is_available(&self) -> bool;

    /// Release client resources.  Safe to call more than once.
    async fn close(&self) {}
}

/// Errors from an image provider.
#[derive(Debug, thiserror::Error)]
pub enum ImageGenError {
    #[error("API key not configured: {0}")]
    ApiKeyMissing(&'static str),

    #[error("image request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("image API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// 2xx response with no decodable image payload.
    #[error("no image returned: {0}")]
    EmptyResponse(String),
}

/// Image-generation capability.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Generate one image for a prompt, returning raw encoded bytes.
    async fn generate(&self, prompt: &str) -> Result<Vec<u8>, ImageGenError>;

    /// Release client resources.  Safe to call more than once.
    async fn close(&self) {}
}
