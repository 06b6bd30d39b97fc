//! Hand-written SQL per entity
//!
//! Each entity has an `#[async_trait]` repository trait with a Postgres
//! implementation. Services hold the traits as `Arc<dyn ...>` so the web
//! crate's tests can swap in in-memory implementations.
//!
//! Every driver error leaves this module already translated into a
//! [`DbError`](crate::db::DbError).

pub mod category;
pub mod filter;
pub mod location;
pub mod task;
pub mod user;

use sqlx::PgPool;
use std::sync::Arc;

pub use category::{CategoryRepository, PgCategoryRepository};
pub use filter::{build_filter_clause, FilterArg, FilterClause};
pub use location::{LocationRepository, PgLocationRepository};
pub use task::{PgTaskRepository, TaskRepository};
pub use user::{PgUserRepository, UserRepository};

/// One handle per repository
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub locations: Arc<dyn LocationRepository>,
    pub tasks: Arc<dyn TaskRepository>,
}

impl Repositories {
    /// Postgres-backed repositories sharing one pool
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            categories: Arc::new(PgCategoryRepository::new(pool.clone())),
            locations: Arc::new(PgLocationRepository::new(pool.clone())),
            tasks: Arc::new(PgTaskRepository::new(pool)),
        }
    }
}
