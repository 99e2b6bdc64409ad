//! Imagen-style image generation binding.
//!
//! Wraps the `:predict` endpoint, requesting one image per prompt and
//! decoding the base64 payload into raw bytes for upload.

use async_trait::async_trait;
use base64::Engine;
use serde::Deserialize;
use serde_json::json;

use crate::provider::{ImageGenError, ImageProvider};

/// Image model used for embedded image requests.
pub const IMAGE_MODEL: &str = "imagen-4.0-fast-generate-001";

/// Default API base URL; override with `GEMINI_BASE_URL`.
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Fixed request timeout.  Image generation is the slowest call in the
/// pipeline.
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(60);

#[derive(Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Deserialize)]
struct Prediction {
    #[serde(rename = "bytesBase64Encoded")]
    bytes_base64: Option<String>,
}

/// `:predict` client for the configured image model.
pub struct ImagenProvider {
    client: Option<reqwest::Client>,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl ImagenProvider {
    /// Build a provider reading `GOOGLE_API_KEY` from the environment.
    pub fn from_env() -> Self {
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
            model: IMAGE_MODEL.to_string(),
        }
    }
}

#[async_trait]
impl ImageProvider for ImagenProvider {
    async fn generate(&self, prompt: &str) -> Result<Vec<u8>, ImageGenError> {
        let (client, api_key) = match (&self.client, &self.api_key) {
            (Some(client), Some(key)) => (client, key),
            _ => return Err(ImageGenError::ApiKeyMissing("GOOGLE_API_KEY")),
        };

        let body = json!({
            "instances": [{ "prompt": prompt }],
            "parameters": { "sampleCount": 1 },
        });

        let response = client
            .post(format!(
                "{}/v1beta/models/{}:predict",
                self.base_url, self.model
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
            return Err(ImageGenError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: PredictResponse = response.json().await?;
        let encoded = parsed
            .predictions
            .into_iter()
            .find_map(|p| p.bytes_base64)
            .ok_or_else(|| ImageGenError::EmptyResponse("no predictions".to_string()))?;

        base64::engine::general_purpose::STANDARD
            .decode(&encoded)
            .map_err(|e| ImageGenError::EmptyResponse(format!("invalid base64 payload: {e}")))
    }
}
