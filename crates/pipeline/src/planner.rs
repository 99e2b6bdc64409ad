//! Planning stage: turn a job's raw request into per-screen prompts.
//!
//! Two strategies produce the same output shape:
//!
//! - [`PlanStrategy::SingleShot`] -- one completion call with the screen
//!   planner system prompt.
//! - [`PlanStrategy::Chained`] -- enhance the raw request into a brief,
//!   derive an information architecture from the brief, then expand it
//!   into exactly `screen_count` sub-prompts.  The intermediate
//!   artifacts are returned so the runner can persist them on the job.
//!
//! Every step parses provider output as strict JSON (after stripping a
//! stray code fence); any provider or parse failure becomes a
//! [`PromptGenerationFailed`], which the runner converts into the
//! fail-gracefully path.  The provider handle is closed on every exit.

use serde::{Deserialize, Serialize};

use genui_core::document::strip_code_fences;
use genui_db::models::Job;
use genui_llm::{ChatMessage, CompletionProvider};

use crate::error::PromptGenerationFailed;
use crate::prompts;
use crate::providers::ProviderFactory;

/// How the planning stage produces its prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlanStrategy {
    /// One completion call.
    SingleShot,
    /// Enhance -> architect -> decompose.
    #[default]
    Chained,
}

impl PlanStrategy {
    /// Parse a config label; unknown labels fall back to the default.
    pub fn from_label(label: &str) -> Self {
        match label {
            "single" | "single-shot" => PlanStrategy::SingleShot,
            _ => PlanStrategy::Chained,
        }
    }
}

/// One planned screen: the brief a worker agent turns into a document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenPlan {
    #[serde(default)]
    pub screen_id: Option<String>,
    pub screen_name: String,
    #[serde(default)]
    pub screen_type: Option<String>,
    /// Self-contained structured brief (`<sub_prompt_details>...`).
    pub sub_prompt: String,
}

/// The `screens` wrapper every planning response uses.
#[derive(Debug, Deserialize)]
struct PlanResponse {
    screens: Vec<ScreenPlan>,
}

/// Planning result: the per-screen plans plus any chain artifacts.
#[derive(Debug)]
pub struct PlanOutput {
    pub plans: Vec<ScreenPlan>,
    /// Enhanced brief (chained strategy only).
    pub optimized_prompt: Option<String>,
    /// Screen sitemap (chained strategy only).
    pub information_architecture: Option<serde_json::Value>,
}

/// Run the planning stage for a job.
pub async fn plan(
    factory: &dyn ProviderFactory,
    job: &Job,
    strategy: PlanStrategy,
) -> Result<PlanOutput, PromptGenerationFailed> {
    let provider = factory
        .completion(&job.model)
        .map_err(|e| PromptGenerationFailed(format!("provider instantiation failed: {e}")))?;

    let result = match strategy {
        PlanStrategy::SingleShot => plan_single_shot(provider.as_ref(), job).await,
        PlanStrategy::Chained => plan_chained(provider.as_ref(), job).await,
    };

    // Release the provider regardless of how planning ended.
    provider.close().await;
    result
}

async fn plan_single_shot(
    provider: &dyn CompletionProvider,
    job: &Job,
) -> Result<PlanOutput, PromptGenerationFailed> {
    tracing::info!(job_id = job.id, "Generating screen prompts (single shot)");

    let style = prompts::style_guide(None);
    let system = prompts::screen_planner(
        job.screen_count,
        job.generation_type().label(),
        &style,
    );
    let messages = [
        ChatMessage::system(system),
        ChatMessage::user(job.user_prompt.clone()),
    ];

    let response = provider
        .complete(&messages)
        .await
        .map_err(|e| PromptGenerationFailed(format!("completion request failed: {e}")))?;

    let plans = parse_screens(&response)?;
    Ok(PlanOutput {
        plans,
        optimized_prompt: None,
        information_architecture: None,
    })
}

async fn plan_chained(
    provider: &dyn CompletionProvider,
    job: &Job,
) -> Result<PlanOutput, PromptGenerationFailed> {
    tracing::info!(job_id = job.id, "Generating screen prompts (chained)");

    // Step 1: enhance the raw request into a structured brief.
    let brief = complete_json_step(
        provider,
        prompts::prompt_enhancer(),
        job.user_prompt.clone(),
        "prompt enhancement",
    )
    .await?;

    // Step 2: derive the information architecture from the brief.
    let architecture = complete_json_step(
        provider,
        prompts::information_architect(),
        brief.to_string(),
        "information architecture",
    )
    .await?;

    // Step 3: expand the sitemap into exactly screen_count sub-prompts.
    // The decomposer sees the architecture plus the job's count and mode.
    let mut decompose_input = architecture.clone();
    if let Some(obj) = decompose_input.as_object_mut() {
        obj.insert("screen_count".into(), serde_json::json!(job.screen_count));
        obj.insert(
            "generation_type".into(),
            serde_json::json!(job.generation_type().label()),
        );
    }
    let system = prompts::sub_prompt_generator(job.screen_count, job.generation_type().label());
    let messages = [
        ChatMessage::system(system),
        ChatMessage::user(decompose_input.to_string()),
    ];
    let response = provider
        .complete(&messages)
        .await
        .map_err(|e| PromptGenerationFailed(format!("sub-prompt expansion failed: {e}")))?;
    let plans = parse_screens(&response)?;

    let optimized_prompt = brief
        .get("enhanced_prompt")
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .or_else(|| Some(brief.to_string()));

    Ok(PlanOutput {
        plans,
        optimized_prompt,
        information_architecture: Some(architecture),
    })
}

/// Run one chain step and parse its output as a JSON object.
async fn complete_json_step(
    provider: &dyn CompletionProvider,
    system: String,
    user: String,
    step: &'static str,
) -> Result<serde_json::Value, PromptGenerationFailed> {
    let messages = [ChatMessage::system(system), ChatMessage::user(user)];
    let response = provider
        .complete(&messages)
        .await
        .map_err(|e| PromptGenerationFailed(format!("{step} failed: {e}")))?;

    serde_json::from_str(strip_code_fences(&response))
        .map_err(|e| PromptGenerationFailed(format!("{step} returned malformed JSON: {e}")))
}

/// Parse a planning response into screen plans.
fn parse_screens(response: &str) -> Result<Vec<ScreenPlan>, PromptGenerationFailed> {
    let parsed: PlanResponse = serde_json::from_str(strip_code_fences(response))
        .map_err(|e| PromptGenerationFailed(format!("planner returned malformed JSON: {e}")))?;
    Ok(parsed.screens)
}
