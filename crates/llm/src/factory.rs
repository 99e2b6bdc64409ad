//! Provider factory: model name -> configured completion provider.

use crate::models::find_model;
use crate::provider::{CompletionError, CompletionProvider};
use crate::providers::gemini::GeminiProvider;
use crate::providers::openai::OpenAiProvider;

/// Create a completion provider for the given model name.
///
/// Fails with `UnsupportedModel` for names outside the registry and with
/// `ApiKeyMissing` when the matching provider's key is not configured --
/// an unconfigured provider is an instantiation error, not a per-request
/// surprise.
pub fn create_provider(model: &str) -> Result<Box<dyn CompletionProvider>, CompletionError> {
    let config = find_model(model)
        .ok_or_else(|| CompletionError::UnsupportedModel(model.to_string()))?;

    let provider: Box<dyn CompletionProvider> = if config.name.starts_with("gemini") {
        Box::new(GeminiProvider::from_env(*config))
    } else {
        Box::new(OpenAiProvider::from_env(*config))
    };

    if !provider.is_available() {
        let key = if config.name.starts_with("gemini") {
            "GOOGLE_API_KEY"
        } else {
            "OPENAI_API_KEY"
        };
        return Err(CompletionError::ApiKeyMissing(key));
    }

    tracing::debug!(model, "Instantiated completion provider");
    Ok(provider)
}
