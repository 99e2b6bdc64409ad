//! Result reconciliation: persist outcomes and settle credits.
//!
//! Outcomes are paired with the pre-existing components positionally;
//! the persisted component id is authoritative for identity.  The
//! success count accumulates over the full loop and drives a single
//! conditional credit decrement.

use genui_core::types::DbId;
use genui_db::models::Component;
use genui_db::JobStore;

use crate::error::PipelineError;
use crate::generator::Outcome;

/// Persist every outcome onto its component and return the number of
/// successes.
///
/// Precondition: `components.len() == outcomes.len()`.  A violation is a
/// fatal [`PipelineError::StructuralMismatch`] raised before any write
/// -- a mismatch surviving to this point means an internal invariant
/// broke, and partial silent writes would be worse than stopping.
pub async fn reconcile(
    store: &dyn JobStore,
    components: &[Component],
    outcomes: &[Outcome],
) -> Result<i64, PipelineError> {
    if components.len() != outcomes.len() {
        return Err(PipelineError::StructuralMismatch {
            expected: components.len(),
            actual: outcomes.len(),
        });
    }

    let mut success_count: i64 = 0;

    for (component, outcome) in components.iter().zip(outcomes) {
        match outcome {
            Outcome::Success { code } => {
                store.mark_component_successful(component.id, code).await?;
                success_count += 1;
            }
            Outcome::Failed {
                message,
                invalid_code,
                ..
            } => {
                store
                    .mark_component_failed(component.id, message, invalid_code.as_deref())
                    .await?;
            }
        }
    }

    tracing::info!(
        components = components.len(),
        success_count,
        "Reconciled generation outcomes",
    );
    Ok(success_count)
}

/// Debit the owner's credits by the success count.
///
/// A zero count is a no-op.  Otherwise a single conditional decrement
/// runs; an uncovered balance is reported as a typed failure, not
/// retried, and already-persisted component results stand.
pub async fn consume_credits(
    store: &dyn JobStore,
    user_id: DbId,
    success_count: i64,
) -> Result<(), PipelineError> {
    if success_count == 0 {
        return Ok(());
    }

    if store.consume_credits(user_id, success_count).await? {
        tracing::info!(user_id, credits = success_count, "Consumed credits");
        Ok(())
    } else {
        Err(PipelineError::CreditUpdate {
            user_id,
            amount: success_count,
        })
    }
}
