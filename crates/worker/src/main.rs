//! `genui-worker` -- runs the generation pipeline for one job.
//!
//! Invoked with the job id as its single argument (the network trigger
//! hands the id to this process):
//!
//! ```text
//! genui-worker <job_id>
//! ```
//!
//! # Environment variables
//!
//! | Variable         | Required | Description                               |
//! |------------------|----------|-------------------------------------------|
//! | `DATABASE_URL`   | yes      | Postgres connection URL                   |
//! | `AWS_S3_BUCKET`  | yes      | Bucket for generated image uploads        |
//! | `OPENAI_API_KEY` | no       | Enables the OpenAI completion bindings    |
//! | `GOOGLE_API_KEY` | no       | Enables the Gemini/Imagen bindings        |
//! | `GENUI_PLANNER`  | no       | `chained` (default) or `single`           |

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use genui_cloud::S3BlobStore;
use genui_db::{Database, JobStore, PgJobStore};
use genui_pipeline::{JobRunner, LiveProviders, ProviderFactory};
use genui_worker::WorkerConfig;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "genui_worker=info,genui_pipeline=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let job_id: i64 = std::env::args()
        .nth(1)
        .unwrap_or_else(|| {
            tracing::error!("usage: genui-worker <job_id>");
            std::process::exit(2);
        })
        .parse()
        .unwrap_or_else(|_| {
            tracing::error!("job_id must be a valid integer");
            std::process::exit(2);
        });

    let config = WorkerConfig::from_env();

    let database = Database::new(&config.database_url);
    let pool = database.acquire().await.unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to connect to database");
        std::process::exit(1);
    });

    let blob = S3BlobStore::from_env().await.unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to configure blob storage");
        std::process::exit(1);
    });

    let store: Arc<dyn JobStore> = Arc::new(PgJobStore::new(pool));
    let providers: Arc<dyn ProviderFactory> = Arc::new(LiveProviders::new(Arc::new(blob)));
    let runner = JobRunner::new(store, providers, config.planner);

    match runner.run(job_id).await {
        Ok(summary) => {
            tracing::info!(
                job_id,
                components = summary.components,
                success_count = summary.success_count,
                "Job finished",
            );
        }
        Err(e) => {
            tracing::error!(job_id, error = %e, "Job run failed");
            std::process::exit(1);
        }
    }
}
