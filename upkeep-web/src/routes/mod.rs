//! HTTP route handlers
//!
//! - `health`: liveness and database ping
//! - `auth`: login, logout and registration (public)
//! - `home`: dashboard
//! - `categories`, `locations`, `tasks`: resource CRUD and pickers
//!
//! Mutating handlers answer with `Hx-Refresh: true` so htmx reloads the
//! page that issued them.

pub mod auth;
pub mod categories;
pub mod health;
pub mod home;
pub mod locations;
pub mod tasks;

use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{error::ApiError, views::HX_REFRESH};

/// `/:id` path parameter
#[derive(Debug, Clone, Copy, Deserialize, Validate)]
pub struct IdParam {
    #[validate(range(min = 1))]
    pub id: i64,
}

/// Body of a 201 response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Created {
    pub id: i64,
}

/// `status` with `Hx-Refresh: true`
pub(crate) fn refresh(status: StatusCode) -> Response {
    let mut response = status.into_response();
    response
        .headers_mut()
        .insert(HX_REFRESH, HeaderValue::from_static("true"));
    response
}

/// 201 with the new row's id
pub(crate) fn created(id: i64) -> Response {
    let mut response = (StatusCode::CREATED, Json(Created { id })).into_response();
    response
        .headers_mut()
        .insert(HX_REFRESH, HeaderValue::from_static("true"));
    response
}

/// Fallback for unknown paths
pub async fn not_found() -> ApiError {
    ApiError::NotFound("Route not found".to_string())
}
