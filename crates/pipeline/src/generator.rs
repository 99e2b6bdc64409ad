//! Concurrent generation stage: one worker call per planned screen.
//!
//! All calls are issued together against a single shared completion
//! provider and the stage waits for every one to settle.  A failing call
//! produces a typed [`Outcome::Failed`] in its slot and never cancels or
//! blocks its siblings.  Correlation with persisted components is
//! positional: the i-th plan's outcome belongs to the i-th component in
//! submission order.

use futures::future::join_all;

use genui_core::document;
use genui_db::models::Job;
use genui_llm::models::find_model;
use genui_llm::{ChatMessage, CompletionProvider};

use crate::planner::ScreenPlan;
use crate::prompts;
use crate::providers::ProviderFactory;

/// The result of generating one screen's content.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Normalized generated document (or opaque freeform output).
    Success { code: String },
    /// Typed failure carrying diagnostics; stored on the component.
    Failed {
        message: String,
        /// Raw output that failed structured-output validation.
        invalid_code: Option<String>,
        /// The brief that produced the failure.
        sub_prompt: Option<String>,
    },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }
}

/// Generate content for every plan, settle-all.
///
/// Always returns exactly `plans.len()` outcomes.  Provider
/// instantiation failure fails every slot with the same message instead
/// of aborting the run: per-screen errors are values, not exceptions.
pub async fn generate(
    factory: &dyn ProviderFactory,
    job: &Job,
    plans: &[ScreenPlan],
) -> Vec<Outcome> {
    tracing::info!(
        job_id = job.id,
        prompts = plans.len(),
        model = %job.model,
        "Starting concurrent generation",
    );

    let provider = match factory.completion(&job.model) {
        Ok(provider) => provider,
        Err(e) => {
            tracing::error!(job_id = job.id, error = %e, "Provider instantiation failed");
            return plans
                .iter()
                .map(|plan| Outcome::Failed {
                    message: format!("provider instantiation failed: {e}"),
                    invalid_code: None,
                    sub_prompt: Some(plan.sub_prompt.clone()),
                })
                .collect();
        }
    };

    let device = job.device_spec();
    let system = prompts::component_generator(&device, job.platform.as_deref());
    let strict = find_model(&job.model)
        .map(|m| m.structured_output)
        .unwrap_or(false);

    let tasks = plans
        .iter()
        .map(|plan| generate_one(provider.as_ref(), &system, plan, strict));
    let outcomes = join_all(tasks).await;

    provider.close().await;

    let successes = outcomes.iter().filter(|o| o.is_success()).count();
    tracing::info!(
        job_id = job.id,
        successes,
        failures = outcomes.len() - successes,
        "Generation settled",
    );
    outcomes
}

/// Generate one screen.  Every error path collapses into a value.
async fn generate_one(
    provider: &dyn CompletionProvider,
    system: &str,
    plan: &ScreenPlan,
    strict: bool,
) -> Outcome {
    let messages = [
        ChatMessage::system(system.to_string()),
        ChatMessage::user(plan.sub_prompt.clone()),
    ];

    let raw = match provider.complete(&messages).await {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!(screen = %plan.screen_name, error = %e, "Screen generation failed");
            return Outcome::Failed {
                message: format!("generation request failed: {e}"),
                invalid_code: None,
                sub_prompt: Some(plan.sub_prompt.clone()),
            };
        }
    };

    match document::try_parse(&raw) {
        Ok(doc) => {
            // Canonical compact form; idempotent by construction.
            let code = serde_json::to_string(&doc).unwrap_or(raw);
            tracing::debug!(screen = %plan.screen_name, "Screen generated");
            Outcome::Success { code }
        }
        Err(e) if strict => {
            // This model's binding pins structured output, so an
            // unparseable payload is a failed generation.
            tracing::warn!(screen = %plan.screen_name, error = %e, "Invalid structured output");
            Outcome::Failed {
                message: format!("invalid structured output: {e}"),
                invalid_code: Some(raw),
                sub_prompt: Some(plan.sub_prompt.clone()),
            }
        }
        Err(_) => {
            // Freeform contract: keep the raw output verbatim and let
            // downstream consumers treat it as opaque.
            Outcome::Success { code: raw }
        }
    }
}
