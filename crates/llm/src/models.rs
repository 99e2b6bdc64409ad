//! Registry of supported text-generation models.

/// Sampling temperatures available for a model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureOptions {
    pub default: f32,
    pub creative: f32,
}

/// Static configuration for one supported model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelConfig {
    pub name: &'static str,
    pub description: &'static str,
    pub max_tokens: u32,
    pub temperature: TemperatureOptions,
    /// Whether the binding pins the response to structured JSON.  For
    /// these models an unparseable payload is a generation failure, not
    /// opaque freeform output.
    pub structured_output: bool,
}

/// All models the factory can bind a provider for.
pub const AVAILABLE_MODELS: &[ModelConfig] = &[
    ModelConfig {
        name: "gpt-4",
        description: "OpenAI GPT-4",
        max_tokens: 5_000,
        temperature: TemperatureOptions {
            default: 0.7,
            creative: 1.0,
        },
        structured_output: false,
    },
    ModelConfig {
        name: "gpt-5",
        description: "OpenAI GPT-5",
        max_tokens: 5_000,
        temperature: TemperatureOptions {
            default: 0.7,
            creative: 1.0,
        },
        structured_output: false,
    },
    ModelConfig {
        name: "gpt-5-mini",
        description: "OpenAI GPT-5 mini",
        max_tokens: 5_000,
        temperature: TemperatureOptions {
            default: 0.7,
            creative: 1.0,
        },
        structured_output: false,
    },
    ModelConfig {
        name: "gemini-2.5-pro",
        description: "Google Gemini 2.5 Pro",
        max_tokens: 10_000,
        temperature: TemperatureOptions {
            default: 0.7,
            creative: 1.0,
        },
        structured_output: true,
    },
];

/// Look up a model's configuration by name.
pub fn find_model(name: &str) -> Option<&'static ModelConfig> {
    AVAILABLE_MODELS.iter().find(|m| m.name == name)
}
