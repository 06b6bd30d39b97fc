//! Postgres error translation
//!
//! Repositories funnel every `sqlx::Error` through [`translate`] so that the
//! rest of the application only ever sees three outcomes: the row was not
//! there, the row clashed with a unique constraint, or something else broke.
//!
//! ```text
//! 23505 unique_violation       -> DbError::Conflict
//! 23503 foreign_key_violation  -> DbError::NotFound
//! 23502 not_null_violation     -> DbError::NotFound
//! RowNotFound                  -> DbError::NotFound
//! anything else                -> DbError::Sqlx
//! ```

use thiserror::Error;

/// Class 23: integrity constraint violation
pub const UNIQUE_VIOLATION: &str = "23505";
pub const FOREIGN_KEY_VIOLATION: &str = "23503";
pub const NOT_NULL_VIOLATION: &str = "23502";
pub const CHECK_VIOLATION: &str = "23514";

/// Repository-level error
#[derive(Debug, Error)]
pub enum DbError {
    /// The requested (or referenced) row does not exist
    #[error("{0}")]
    NotFound(String),

    /// A unique constraint rejected the write
    #[error("{0}")]
    Conflict(String),

    /// Any other driver failure
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

pub type DbResult<T> = Result<T, DbError>;

/// Coarse classification of a driver error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
}

/// Classifies a Postgres SQLSTATE code
pub fn classify_code(code: &str) -> Option<ErrorKind> {
    match code {
        UNIQUE_VIOLATION => Some(ErrorKind::Conflict),
        FOREIGN_KEY_VIOLATION | NOT_NULL_VIOLATION => Some(ErrorKind::NotFound),
        _ => None,
    }
}

/// Classifies a `sqlx::Error`
pub fn classify_sqlx(err: &sqlx::Error) -> Option<ErrorKind> {
    match err {
        sqlx::Error::RowNotFound => Some(ErrorKind::NotFound),
        sqlx::Error::Database(db_err) => db_err.code().and_then(|code| classify_code(&code)),
        _ => None,
    }
}

/// Translates a driver error into a [`DbError`]
///
/// `entity` is a human name such as `"category"`; `id` is included in the
/// message when the caller knows which row it was working on.
pub fn translate(err: sqlx::Error, entity: &str, id: Option<i64>) -> DbError {
    match classify_sqlx(&err) {
        Some(ErrorKind::Conflict) => {
            tracing::debug!(entity, error = %err, "Unique constraint violated");
            DbError::Conflict(match id {
                Some(id) => format!("{} with ID {} already exists", entity, id),
                None => format!("{} already exists", entity),
            })
        }
        Some(ErrorKind::NotFound) => {
            tracing::debug!(entity, error = %err, "Row or reference not found");
            DbError::NotFound(not_found_message(entity, id))
        }
        None => DbError::Sqlx(err),
    }
}

/// Standard "not found" message for an entity
pub fn not_found_message(entity: &str, id: Option<i64>) -> String {
    match id {
        Some(id) => format!("{} with ID {} not found", entity, id),
        None => format!("{} not found", entity),
    }
}
