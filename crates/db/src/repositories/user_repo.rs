//! Repository for the `users` table.

use sqlx::PgPool;

use genui_core::types::DbId;

use crate::models::user::User;

/// Column list shared across queries.
const COLUMNS: &str = "id, credits, created_at";

/// Provides credit accounting for users.
pub struct UserRepo;

impl UserRepo {
    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Conditionally debit `amount` credits from a user.
    ///
    /// The decrement only applies when the current balance covers the
    /// full amount, so the balance can never go negative.  Returns
    /// `false` when the user is missing or the balance is insufficient;
    /// the caller decides how to report that.
    pub async fn consume_credits(
        pool: &PgPool,
        id: DbId,
        amount: i64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET credits = credits - $2 WHERE id = $1 AND credits >= $2",
        )
        .bind(id)
        .bind(amount)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
