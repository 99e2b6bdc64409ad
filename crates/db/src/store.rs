//! Persistent-store seam consumed by the generation pipeline.
//!
//! [`JobStore`] names exactly the read/update operations the
//! orchestrator performs, with typed failures.  [`PgJobStore`] is the
//! Postgres implementation over the repositories; the pipeline's tests
//! substitute an in-memory implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use genui_core::types::DbId;

use crate::models::{Component, Job};
use crate::repositories::{ComponentRepo, JobRepo, UserRepo};

/// Typed failures from the persistent store.
///
/// `NotFound` and `TransitionRejected` are both fatal to a run: a
/// missing row means the caller's premise is wrong, and a rejected
/// transition means another writer got there first (or the status would
/// regress).  Half-written state is worse than a stalled run, so the
/// pipeline stops mutating on any of these.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    #[error("rejected status transition for {entity} with id {id}")]
    TransitionRejected { entity: &'static str, id: DbId },

    #[error("database query failed: {0}")]
    Query(#[from] sqlx::Error),
}

/// The store operations the orchestrator needs, and nothing more.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Load a job; `NotFound` when absent.
    async fn find_job(&self, job_id: DbId) -> Result<Job, StoreError>;

    /// Transition the job Submitted -> Running.
    async fn mark_job_running(&self, job_id: DbId) -> Result<(), StoreError>;

    /// Transition the job to Completed with a completion timestamp.
    async fn complete_job(&self, job_id: DbId) -> Result<(), StoreError>;

    /// Transition the job to Completed carrying an error message
    /// (salvage path: terminal, not retried).
    async fn complete_job_with_error(&self, job_id: DbId, error: &str) -> Result<(), StoreError>;

    /// Persist chained-planner artifacts on the job row.
    async fn store_planning_artifacts(
        &self,
        job_id: DbId,
        optimized_prompt: Option<&str>,
        information_architecture: Option<&serde_json::Value>,
    ) -> Result<(), StoreError>;

    /// List the job's components in submission order.
    async fn list_components(&self, job_id: DbId) -> Result<Vec<Component>, StoreError>;

    /// Attach a sub-prompt to one component and mark it Running.
    async fn assign_sub_prompt(&self, component_id: DbId, sub_prompt: &str)
        -> Result<(), StoreError>;

    /// Record one component's successful result.
    async fn mark_component_successful(
        &self,
        component_id: DbId,
        code: &str,
    ) -> Result<(), StoreError>;

    /// Record one component's failed result, keeping partial output.
    async fn mark_component_failed(
        &self,
        component_id: DbId,
        error: &str,
        invalid_code: Option<&str>,
    ) -> Result<(), StoreError>;

    /// Bulk-fail every open component of a job (salvage path).
    async fn mark_components_failed(&self, job_id: DbId, error: &str) -> Result<(), StoreError>;

    /// Conditionally debit credits.  `Ok(false)` means the balance did
    /// not cover the amount (or the user is gone); nothing was changed.
    async fn consume_credits(&self, user_id: DbId, amount: i64) -> Result<bool, StoreError>;
}

/// Postgres-backed [`JobStore`].
#[derive(Clone)]
pub struct PgJobStore {
    pool: PgPool,
}

impl PgJobStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn find_job(&self, job_id: DbId) -> Result<Job, StoreError> {
        JobRepo::find_by_id(&self.pool, job_id)
            .await?
            .ok_or(StoreError::NotFound {
                entity: "job",
                id: job_id,
            })
    }

    async fn mark_job_running(&self, job_id: DbId) -> Result<(), StoreError> {
        if JobRepo::mark_running(&self.pool, job_id).await? {
            Ok(())
        } else {
            Err(StoreError::TransitionRejected {
                entity: "job",
                id: job_id,
            })
        }
    }

    async fn complete_job(&self, job_id: DbId) -> Result<(), StoreError> {
        if JobRepo::complete(&self.pool, job_id).await? {
            Ok(())
        } else {
            Err(StoreError::TransitionRejected {
                entity: "job",
                id: job_id,
            })
        }
    }

    async fn complete_job_with_error(&self, job_id: DbId, error: &str) -> Result<(), StoreError> {
        if JobRepo::complete_with_error(&self.pool, job_id, error).await? {
            Ok(())
        } else {
            Err(StoreError::TransitionRejected {
                entity: "job",
                id: job_id,
            })
        }
    }

    async fn store_planning_artifacts(
        &self,
        job_id: DbId,
        optimized_prompt: Option<&str>,
        information_architecture: Option<&serde_json::Value>,
    ) -> Result<(), StoreError> {
        JobRepo::store_planning_artifacts(
            &self.pool,
            job_id,
            optimized_prompt,
            information_architecture,
        )
        .await?;
        Ok(())
    }

    async fn list_components(&self, job_id: DbId) -> Result<Vec<Component>, StoreError> {
        Ok(ComponentRepo::list_by_job(&self.pool, job_id).await?)
    }

    async fn assign_sub_prompt(
        &self,
        component_id: DbId,
        sub_prompt: &str,
    ) -> Result<(), StoreError> {
        if ComponentRepo::assign_sub_prompt(&self.pool, component_id, sub_prompt).await? {
            Ok(())
        } else {
            Err(StoreError::TransitionRejected {
                entity: "component",
                id: component_id,
            })
        }
    }

    async fn mark_component_successful(
        &self,
        component_id: DbId,
        code: &str,
    ) -> Result<(), StoreError> {
        if ComponentRepo::mark_successful(&self.pool, component_id, code).await? {
            Ok(())
        } else {
            Err(StoreError::TransitionRejected {
                entity: "component",
                id: component_id,
            })
        }
    }

    async fn mark_component_failed(
        &self,
        component_id: DbId,
        error: &str,
        invalid_code: Option<&str>,
    ) -> Result<(), StoreError> {
        if ComponentRepo::mark_failed(&self.pool, component_id, error, invalid_code).await? {
            Ok(())
        } else {
            Err(StoreError::TransitionRejected {
                entity: "component",
                id: component_id,
            })
        }
    }

    async fn mark_components_failed(&self, job_id: DbId, error: &str) -> Result<(), StoreError> {
        let updated = ComponentRepo::fail_all_for_job(&self.pool, job_id, error).await?;
        tracing::warn!(job_id, updated, error, "Bulk-failed components");
        Ok(())
    }

    async fn consume_credits(&self, user_id: DbId, amount: i64) -> Result<bool, StoreError> {
        Ok(UserRepo::consume_credits(&self.pool, user_id, amount).await?)
    }
}
