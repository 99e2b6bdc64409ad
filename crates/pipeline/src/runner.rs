//! Job lifecycle controller.
//!
//! Sequences the pipeline stages for one job and enforces the status
//! machine and failure policy:
//!
//! 1. Planning failure, or a planned-prompt count that does not match
//!    the pre-existing components, is salvageable: every component is
//!    failed, the job still completes (terminal, not retried), and no
//!    credits are consumed.
//! 2. Any store failure is fatal: no further state mutation, the error
//!    propagates to the caller, and the job stays in whatever status it
//!    last reached.
//! 3. Anything else unexpected is equally fatal.

use std::sync::Arc;

use genui_core::types::DbId;
use genui_db::models::Job;
use genui_db::JobStore;

use crate::enrich;
use crate::error::PipelineError;
use crate::generator;
use crate::planner::{self, PlanStrategy};
use crate::providers::ProviderFactory;
use crate::reconcile;

/// What a completed run did, for logging and the trigger boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRunSummary {
    pub job_id: DbId,
    pub components: usize,
    pub success_count: i64,
}

/// Orchestrates one job from submission to completion.
pub struct JobRunner {
    store: Arc<dyn JobStore>,
    providers: Arc<dyn ProviderFactory>,
    strategy: PlanStrategy,
}

impl JobRunner {
    pub fn new(
        store: Arc<dyn JobStore>,
        providers: Arc<dyn ProviderFactory>,
        strategy: PlanStrategy,
    ) -> Self {
        Self {
            store,
            providers,
            strategy,
        }
    }

    /// Run the full pipeline for `job_id`.
    ///
    /// Fails fast with a store `NotFound` when the job is absent.  Side
    /// effects are ordered but not transactional; each persisted write
    /// is its own operation.
    pub async fn run(&self, job_id: DbId) -> Result<JobRunSummary, PipelineError> {
        let job = self.store.find_job(job_id).await?;
        tracing::info!(job_id, user_id = job.user_id, screen_count = job.screen_count, "Job run starting");

        self.store.mark_job_running(job_id).await?;
        let components = self.store.list_components(job_id).await?;

        // -- Planning --
        let plan = match planner::plan(self.providers.as_ref(), &job, self.strategy).await {
            Ok(plan) => plan,
            Err(e) => {
                tracing::error!(job_id, error = %e, "Planning failed; salvaging run");
                return self.fail_gracefully(&job, components.len(), &e.to_string()).await;
            }
        };

        if plan.optimized_prompt.is_some() || plan.information_architecture.is_some() {
            self.store
                .store_planning_artifacts(
                    job_id,
                    plan.optimized_prompt.as_deref(),
                    plan.information_architecture.as_ref(),
                )
                .await?;
        }

        if plan.plans.len() != components.len() {
            let reason = format!(
                "planner produced {} prompts for {} components",
                plan.plans.len(),
                components.len()
            );
            tracing::error!(job_id, %reason, "Prompt/component mismatch; salvaging run");
            return self.fail_gracefully(&job, components.len(), &reason).await;
        }

        // Attach the briefs to their components, positionally.
        for (component, screen) in components.iter().zip(&plan.plans) {
            self.store
                .assign_sub_prompt(component.id, &screen.sub_prompt)
                .await?;
        }

        // -- Concurrent generation --
        let outcomes = generator::generate(self.providers.as_ref(), &job, &plan.plans).await;

        // -- Image enrichment --
        let component_ids: Vec<DbId> = components.iter().map(|c| c.id).collect();
        let outcomes = enrich::enrich(self.providers.as_ref(), &component_ids, outcomes).await;

        // -- Reconciliation --
        let success_count = reconcile::reconcile(self.store.as_ref(), &components, &outcomes).await?;

        self.store.complete_job(job_id).await?;
        reconcile::consume_credits(self.store.as_ref(), job.user_id, success_count).await?;

        tracing::info!(job_id, success_count, "Job run completed");
        Ok(JobRunSummary {
            job_id,
            components: components.len(),
            success_count,
        })
    }

    /// Salvage path for planning/structural failures: fail every
    /// component, complete the job with the error message, consume no
    /// credits, and return without raising further.  Store failures
    /// inside this path are still fatal.
    async fn fail_gracefully(
        &self,
        job: &Job,
        components: usize,
        reason: &str,
    ) -> Result<JobRunSummary, PipelineError> {
        self.store.mark_components_failed(job.id, reason).await?;
        self.store.complete_job_with_error(job.id, reason).await?;
        tracing::warn!(job_id = job.id, reason, "Job completed on salvage path");
        Ok(JobRunSummary {
            job_id: job.id,
            components,
            success_count: 0,
        })
    }
}
