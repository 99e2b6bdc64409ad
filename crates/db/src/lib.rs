//! Postgres persistence for the GENUI generation backend.
//!
//! Exposes row models, status enums, repositories, and the [`JobStore`]
//! seam the pipeline consumes.  The [`Database`] handle is owned by the
//! process entry point and passed down explicitly -- there is no global
//! connection state.

pub mod models;
pub mod repositories;
pub mod store;

pub use store::{JobStore, PgJobStore, StoreError};

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tokio::sync::RwLock;

/// Maximum connections in the process-wide pool.
const MAX_CONNECTIONS: u32 = 5;

/// Per-connection acquire timeout.
const ACQUIRE_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(5);

/// Cheap liveness probe, run before each pipeline run.
pub async fn health_check(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Caller-owned database handle with lazy reconnect.
///
/// The first [`acquire`](Self::acquire) connects; later calls health-check
/// the existing pool and reconnect once if the check fails.  Failures
/// beyond that surface to the caller as [`sqlx::Error`].
pub struct Database {
    url: String,
    pool: RwLock<Option<PgPool>>,
}

impl Database {
    /// Create a handle for the given connection URL.  No connection is
    /// attempted until first use.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            pool: RwLock::new(None),
        }
    }

    /// Return a healthy pool, connecting or reconnecting as needed.
    pub async fn acquire(&self) -> Result<PgPool, sqlx::Error> {
        if let Some(pool) = self.pool.read().await.as_ref() {
            match health_check(pool).await {
                Ok(()) => return Ok(pool.clone()),
                Err(e) => {
                    tracing::warn!(error = %e, "Database health check failed, reconnecting");
                }
            }
        }

        let mut guard = self.pool.write().await;
        // Another task may have reconnected while we waited for the lock.
        if let Some(pool) = guard.as_ref() {
            if health_check(pool).await.is_ok() {
                return Ok(pool.clone());
            }
        }

        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect(&self.url)
            .await?;
        tracing::info!("Connected to database");
        *guard = Some(pool.clone());
        Ok(pool)
    }
}
