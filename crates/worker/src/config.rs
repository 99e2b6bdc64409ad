//! Worker configuration loaded from environment variables.

use genui_pipeline::PlanStrategy;

/// Process configuration for one worker invocation.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Postgres connection URL.
    pub database_url: String,
    /// Planning strategy: `chained` (default) or `single`.
    pub planner: PlanStrategy,
}

impl WorkerConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var         | Required | Default   |
    /// |-----------------|----------|-----------|
    /// | `DATABASE_URL`  | yes      | --        |
    /// | `GENUI_PLANNER` | no       | `chained` |
    pub fn from_env() -> Self {
        let database_url =
            std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let planner = std::env::var("GENUI_PLANNER")
            .map(|label| PlanStrategy::from_label(&label))
            .unwrap_or_default();

        Self {
            database_url,
            planner,
        }
    }
}
