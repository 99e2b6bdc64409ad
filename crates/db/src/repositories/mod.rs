//! Repositories: one unit struct per table, static async methods over a
//! borrowed [`sqlx::PgPool`].

pub mod component_repo;
pub mod job_repo;
pub mod user_repo;

pub use component_repo::ComponentRepo;
pub use job_repo::JobRepo;
pub use user_repo::UserRepo;
