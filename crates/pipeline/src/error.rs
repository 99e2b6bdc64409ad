//! Pipeline error taxonomy.
//!
//! Propagation policy:
//! - Errors local to one generation or image task never escape the
//!   fan-out boundary; they are captured as [`Outcome::Failed`] values.
//! - Store errors always escape and stop the run: a half-written state
//!   is worse than a stalled one.
//! - Planning errors ([`PromptGenerationFailed`]) are converted by the
//!   runner into the bulk fail-gracefully path and never escape raw,
//!   which is why they are a separate type rather than a
//!   [`PipelineError`] variant.
//!
//! [`Outcome::Failed`]: crate::generator::Outcome

use genui_core::types::DbId;
use genui_db::StoreError;

/// Planning could not produce usable prompts: a provider call failed,
/// its output was not valid JSON, or a chain step returned the wrong
/// shape.
#[derive(Debug, thiserror::Error)]
#[error("failed to create generation sub-prompts: {0}")]
pub struct PromptGenerationFailed(pub String);

/// Fatal failures of a pipeline run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Store failure: row not found, query failed, or a status
    /// transition was rejected.  No further state mutation is attempted
    /// after one of these.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The outcome count diverged from the persisted component count at
    /// reconciliation time.  The planner-side count is verified before
    /// generation, so reaching this means an internal invariant broke;
    /// nothing is persisted.
    #[error("outcome count does not match persisted components: expected {expected}, got {actual}")]
    StructuralMismatch { expected: usize, actual: usize },

    /// Credit debit failed: the balance did not cover the amount.
    /// Already-persisted component results are not rolled back.
    #[error("failed to consume {amount} credits for user {user_id}")]
    CreditUpdate { user_id: DbId, amount: i64 },
}
