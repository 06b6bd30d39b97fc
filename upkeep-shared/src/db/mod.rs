//! Database layer
//!
//! - `pool`: PostgreSQL connection pool management with health checks
//! - `migrations`: schema migrations embedded from `migrations/`
//! - `errors`: translation of Postgres error codes into [`errors::DbError`]

pub mod errors;
pub mod migrations;
pub mod pool;

pub use errors::{DbError, DbResult};
