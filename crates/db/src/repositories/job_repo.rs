//! Repository for the `jobs` table.
//!
//! Status transitions are guarded in SQL (`status_id < $new`) so job
//! status is monotonic: Submitted -> Running -> Completed.  A guard that
//! matches no row reports the rejection to the caller instead of
//! silently regressing a completed job.

use sqlx::PgPool;

use genui_core::types::DbId;

use crate::models::job::Job;
use crate::models::status::JobStatus;

/// Column list for `jobs` queries.
const COLUMNS: &str = "\
    id, user_id, user_prompt, status_id, screen_count, model, device, \
    generation_type, platform, optimized_prompt, information_architecture, \
    created_at, completed_at, error_message";

/// Provides read/update operations for generation jobs.
///
/// The orchestrator never inserts or deletes job rows; submission is
/// handled upstream.
pub struct JobRepo;

impl JobRepo {
    /// Find a job by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Job>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM jobs WHERE id = $1");
        sqlx::query_as::<_, Job>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Transition a job to Running.
    ///
    /// Returns `false` if the job does not exist or is already Running
    /// or Completed (the transition would regress or repeat).
    pub async fn mark_running(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE jobs SET status_id = $2 WHERE id = $1 AND status_id < $2")
            .bind(id)
            .bind(JobStatus::Running.id())
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Transition a job to Completed and stamp `completed_at`.
    ///
    /// Returns `false` if the job was already Completed.
    pub async fn complete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE jobs SET status_id = $2, completed_at = NOW() \
             WHERE id = $1 AND status_id < $2",
        )
        .bind(id)
        .bind(JobStatus::Completed.id())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Transition a job to Completed with an error message.
    ///
    /// Used by the salvage path: the run is terminal and will not be
    /// retried, but the failure reason is kept on the row.
    pub async fn complete_with_error(
        pool: &PgPool,
        id: DbId,
        error: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE jobs SET status_id = $2, completed_at = NOW(), error_message = $3 \
             WHERE id = $1 AND status_id < $2",
        )
        .bind(id)
        .bind(JobStatus::Completed.id())
        .bind(error)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Persist the chained planner's intermediate artifacts.
    pub async fn store_planning_artifacts(
        pool: &PgPool,
        id: DbId,
        optimized_prompt: Option<&str>,
        information_architecture: Option<&serde_json::Value>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE jobs SET \
                optimized_prompt = COALESCE($2, optimized_prompt), \
                information_architecture = COALESCE($3, information_architecture) \
             WHERE id = $1",
        )
        .bind(id)
        .bind(optimized_prompt)
        .bind(information_architecture)
        .execute(pool)
        .await?;
        Ok(())
    }
}
