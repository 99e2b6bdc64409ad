//! Component entity model: one generated screen's persisted record.

use genui_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use super::status::StatusId;

/// A row from the `generated_components` table.
///
/// The set of components belonging to a job is fixed at submission time;
/// the orchestrator updates rows in place and never inserts or deletes
/// them during a run.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Component {
    pub id: DbId,
    pub parent_job_id: DbId,
    pub status_id: StatusId,
    /// Planning-stage brief for this screen.
    pub sub_prompt: Option<String>,
    /// Normalized generated document, or raw invalid output on failure.
    pub code: Option<String>,
    pub error_message: Option<String>,
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
}
