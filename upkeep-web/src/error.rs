//! Error handling for the web server
//!
//! Every handler returns `Result<T, ApiError>`. `ApiError` is the single
//! place where failures become HTTP responses, so lower layers only ever
//! describe *what* went wrong.
//!
//! Responses share one JSON envelope:
//!
//! ```json
//! {
//!   "code": "INVALID_FORMAT",
//!   "message": "Validation failed",
//!   "parameters": ["name"],
//!   "violations": [{ "name": "name", "message": "This field is required" }]
//! }
//! ```
//!
//! | Variant        | Status | Code                    |
//! |----------------|--------|-------------------------|
//! | `Validation`   | 400    | `INVALID_FORMAT`        |
//! | `Unauthorized` | 401    | `UNAUTHORIZED`          |
//! | `NotFound`     | 404    | `NOT_FOUND`             |
//! | `Conflict`     | 409    | `CONFLICT`              |
//! | `Internal`     | 500    | `INTERNAL_SERVER_ERROR` |
//!
//! Internal errors are logged with their cause; clients only ever see
//! "Internal server error".

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use upkeep_shared::{
    auth::{password::PasswordError, SessionError},
    db::DbError,
    service::ServiceError,
};

pub type ApiResult<T> = Result<T, ApiError>;

/// Generic message for rule violations
pub const VALIDATION_FAILED: &str = "Validation failed";

/// Message for bodies that are not parseable JSON
pub const INVALID_JSON: &str = "Invalid JSON syntax";

/// One field-level failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub name: String,
    pub message: String,
}

impl Violation {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// Everything wrong with one request's input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    pub message: String,
    pub violations: Vec<Violation>,
}

impl ValidationFailure {
    pub fn new(message: impl Into<String>, violations: Vec<Violation>) -> Self {
        Self {
            message: message.into(),
            violations,
        }
    }

    /// A "Validation failed" error about a single field
    pub fn field(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(VALIDATION_FAILED, vec![Violation::new(name, message)])
    }

    /// Names of the failing fields, in violation order
    pub fn parameters(&self) -> Vec<String> {
        self.violations.iter().map(|v| v.name.clone()).collect()
    }
}

#[derive(Debug)]
pub enum ApiError {
    Validation(ValidationFailure),
    Unauthorized(String),
    NotFound(String),
    Conflict(String),
    Internal(String),
}

/// Wire format of every error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(default)]
    pub parameters: Vec<String>,
    #[serde(default)]
    pub violations: Vec<Violation>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Validation(failure) => write!(
                f,
                "{}: {} violation(s)",
                failure.message,
                failure.violations.len()
            ),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self {
            ApiError::Validation(failure) => ErrorBody {
                code: "INVALID_FORMAT".to_string(),
                parameters: failure.parameters(),
                message: failure.message,
                violations: failure.violations,
            },
            ApiError::Unauthorized(msg) => simple("UNAUTHORIZED", msg),
            ApiError::NotFound(msg) => simple("NOT_FOUND", msg),
            ApiError::Conflict(msg) => simple("CONFLICT", msg),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                simple("INTERNAL_SERVER_ERROR", "Internal server error".to_string())
            }
        };

        (status, Json(body)).into_response()
    }
}

fn simple(code: &str, message: String) -> ErrorBody {
    ErrorBody {
        code: code.to_string(),
        message,
        parameters: Vec::new(),
        violations: Vec::new(),
    }
}

impl From<ValidationFailure> for ApiError {
    fn from(failure: ValidationFailure) -> Self {
        ApiError::Validation(failure)
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound(msg) => ApiError::NotFound(msg),
            DbError::Conflict(msg) => ApiError::Conflict(msg),
            DbError::Sqlx(e) => ApiError::Internal(format!("Database error: {}", e)),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Db(e) => e.into(),
            ServiceError::InvalidCredentials => {
                ApiError::Unauthorized("Invalid email or password".to_string())
            }
            ServiceError::Password(e) => e.into(),
            ServiceError::Invalid { field, message } => {
                ApiError::Validation(ValidationFailure::field(field, message))
            }
        }
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::Internal(format!("Password error: {}", err))
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        ApiError::Internal(format!("Session error: {}", err))
    }
}
