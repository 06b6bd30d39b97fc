//! Business layer
//!
//! Services turn validated request DTOs into domain records, apply the few
//! rules that span fields or rows, and delegate to the repositories.
//! Anything the repositories report passes through unchanged inside
//! [`ServiceError::Db`].

pub mod category;
pub mod location;
pub mod task;
pub mod user;

use crate::auth::password::PasswordError;
use crate::db::DbError;
use crate::repository::Repositories;

pub use category::CategoryService;
pub use location::LocationService;
pub use task::{TaskService, TaskStats};
pub use user::UserService;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Db(#[from] DbError),

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error(transparent)]
    Password(#[from] PasswordError),

    /// A field passed its own rules but conflicts with the rest of the record
    #[error("{field}: {message}")]
    Invalid { field: String, message: String },
}

impl ServiceError {
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        ServiceError::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// All services over one set of repositories
#[derive(Clone)]
pub struct Services {
    pub users: UserService,
    pub categories: CategoryService,
    pub locations: LocationService,
    pub tasks: TaskService,
}

impl Services {
    pub fn new(repos: Repositories) -> Self {
        Self {
            users: UserService::new(repos.users),
            categories: CategoryService::new(repos.categories),
            locations: LocationService::new(repos.locations),
            tasks: TaskService::new(repos.tasks),
        }
    }
}
