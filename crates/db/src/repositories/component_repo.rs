//! Repository for the `generated_components` table.
//!
//! Components are created at job submission and only ever updated in
//! place by the orchestrator.  Terminal updates (Successful/Failed) only
//! apply to rows still in a non-terminal status.

use sqlx::PgPool;

use genui_core::types::DbId;

use crate::models::component::Component;
use crate::models::status::{ComponentStatus, StatusId};

/// Column list for `generated_components` queries.
const COLUMNS: &str = "\
    id, parent_job_id, status_id, sub_prompt, code, error_message, \
    completed_at, created_at";

/// Non-terminal statuses a result update may replace.
const OPEN_STATUSES: [StatusId; 2] = [
    ComponentStatus::Submitted as StatusId,
    ComponentStatus::Running as StatusId,
];

/// Provides read/update operations for per-screen components.
pub struct ComponentRepo;

impl ComponentRepo {
    /// List a job's components in submission order.
    ///
    /// Submission order is insertion order (`id ASC`); the pipeline
    /// correlates planned prompts and outcomes with this ordering
    /// positionally.
    pub async fn list_by_job(pool: &PgPool, job_id: DbId) -> Result<Vec<Component>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM generated_components WHERE parent_job_id = $1 ORDER BY id ASC");
        sqlx::query_as::<_, Component>(&query)
            .bind(job_id)
            .fetch_all(pool)
            .await
    }

    /// Attach a planning-stage sub-prompt and move the component to
    /// Running.  Returns `false` for rows already in a terminal status.
    pub async fn assign_sub_prompt(
        pool: &PgPool,
        id: DbId,
        sub_prompt: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE generated_components \
             SET sub_prompt = $2, status_id = $3 \
             WHERE id = $1 AND status_id = ANY($4)",
        )
        .bind(id)
        .bind(sub_prompt)
        .bind(ComponentStatus::Running.id())
        .bind(&OPEN_STATUSES[..])
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Record a successful generation result and stamp `completed_at`.
    pub async fn mark_successful(
        pool: &PgPool,
        id: DbId,
        code: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE generated_components \
             SET status_id = $2, code = $3, error_message = NULL, completed_at = NOW() \
             WHERE id = $1 AND status_id = ANY($4)",
        )
        .bind(id)
        .bind(ComponentStatus::Successful.id())
        .bind(code)
        .bind(&OPEN_STATUSES[..])
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Record a failed generation result, keeping any partial invalid
    /// output for diagnostics, and stamp `completed_at`.
    pub async fn mark_failed(
        pool: &PgPool,
        id: DbId,
        error: &str,
        invalid_code: Option<&str>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE generated_components \
             SET status_id = $2, error_message = $3, code = COALESCE($4, code), \
                 completed_at = NOW() \
             WHERE id = $1 AND status_id = ANY($5)",
        )
        .bind(id)
        .bind(ComponentStatus::Failed.id())
        .bind(error)
        .bind(invalid_code)
        .bind(&OPEN_STATUSES[..])
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Bulk-fail every open component of a job.
    ///
    /// Used by the planning-failure salvage path.  Returns the number of
    /// rows updated.
    pub async fn fail_all_for_job(
        pool: &PgPool,
        job_id: DbId,
        error: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE generated_components \
             SET status_id = $2, error_message = $3, completed_at = NOW() \
             WHERE parent_job_id = $1 AND status_id = ANY($4)",
        )
        .bind(job_id)
        .bind(ComponentStatus::Failed.id())
        .bind(error)
        .bind(&OPEN_STATUSES[..])
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
