//! User entity model, reduced to what generation accounting needs.

use genui_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `users` table.
///
/// `credits` never goes negative: the schema carries a CHECK constraint
/// and every debit is a conditional decrement.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub credits: i64,
    pub created_at: Timestamp,
}
