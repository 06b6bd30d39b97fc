/// Authentication endpoints
///
/// These routes sit outside the session gate:
///
/// - `GET /` - Login page
/// - `POST /login` - Check credentials and set the session cookie
/// - `GET /logout` - Clear the session cookie
/// - `GET /register` - Registration page
/// - `POST /register` - Create an account and sign it in

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    middleware::auth::{clear_session_cookie, session_cookie},
    validation::{ValidatedBody, ValidatedQuery},
    views::{self, HX_REDIRECT},
};
use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::Deserialize;
use upkeep_shared::{
    auth::SessionUser,
    models::{LoginRequest, User, UserRequest},
    service::ServiceError,
};
use validator::Validate;

/// Where to go after login when no usable original URL was posted
const DEFAULT_LANDING: &str = "/home";

/// `GET /register?email=`
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct RegisterQuery {
    pub email: String,
}

/// Keeps redirects on this site: only absolute paths, never `//host`
fn landing_page(original_url: &str) -> &str {
    if original_url.starts_with('/') && !original_url.starts_with("//") {
        original_url
    } else {
        DEFAULT_LANDING
    }
}

/// 200 that sets the session cookie and tells htmx where to go
fn signed_in(state: &AppState, user: &User, location: &str) -> ApiResult<Response> {
    let session = SessionUser::issue(user, Utc::now());
    let value = state.sessions.encode(&session.to_values())?;
    let cookie = session_cookie(&value, state.config.session.secure);

    let mut response = StatusCode::OK.into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&cookie).map_err(|e| ApiError::Internal(e.to_string()))?,
    );
    headers.insert(
        HX_REDIRECT,
        HeaderValue::from_str(location).map_err(|e| ApiError::Internal(e.to_string()))?,
    );
    Ok(response)
}

/// Login page
///
/// # Endpoint
///
/// ```text
/// GET /
/// ```
pub async fn login_page(headers: HeaderMap) -> Response {
    views::render(&headers, "Sign in", views::auth::login("", "", None))
}

/// Login
///
/// # Endpoint
///
/// ```text
/// POST /login
/// Content-Type: application/x-www-form-urlencoded
///
/// email=ann@example.com&password=...&original_url=/tasks
/// ```
///
/// On success the `user-session` cookie is set and `Hx-Redirect` points at
/// `original_url`, or `/home` when it is blank or off-site.
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `401 Unauthorized`: Wrong email or password; the body is the login
///   form with the error shown
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    ValidatedBody(request): ValidatedBody<LoginRequest>,
) -> ApiResult<Response> {
    let user = match state
        .services
        .users
        .authenticate(&request.email, &request.password)
        .await
    {
        Ok(user) => user,
        Err(ServiceError::InvalidCredentials) => {
            tracing::warn!(email = %request.email, "Failed login");
            return Ok(views::render_with_status(
                StatusCode::UNAUTHORIZED,
                &headers,
                "Sign in",
                views::auth::login(
                    &request.email,
                    &request.original_url,
                    Some("Invalid email or password"),
                ),
            ));
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(user_id = user.id, "User logged in");
    signed_in(&state, &user, landing_page(&request.original_url))
}

/// Logout
///
/// # Endpoint
///
/// ```text
/// GET /logout
/// ```
///
/// Always 200 with an expired cookie and `Hx-Redirect: /`.
pub async fn logout(State(state): State<AppState>) -> ApiResult<Response> {
    let cookie = clear_session_cookie(state.config.session.secure);

    let mut response = StatusCode::OK.into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&cookie).map_err(|e| ApiError::Internal(e.to_string()))?,
    );
    headers.insert(HX_REDIRECT, HeaderValue::from_static("/"));
    Ok(response)
}

/// Registration page
///
/// # Endpoint
///
/// ```text
/// GET /register?email=ann@example.com
/// ```
pub async fn register_page(
    headers: HeaderMap,
    ValidatedQuery(query): ValidatedQuery<RegisterQuery>,
) -> Response {
    views::render(&headers, "Register", views::auth::register(&query.email))
}

/// Register
///
/// # Endpoint
///
/// ```text
/// POST /register
///
/// first_name=Ann&last_name=Admin&email=ann@example.com&password=...
/// ```
///
/// Creates the account with the `User` role, signs it in and redirects to
/// `/home`.
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `409 Conflict`: Email already registered
pub async fn register(
    State(state): State<AppState>,
    ValidatedBody(request): ValidatedBody<UserRequest>,
) -> ApiResult<Response> {
    let user = state.services.users.register(&request).await?;
    signed_in(&state, &user, DEFAULT_LANDING)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landing_page_stays_on_site() {
        assert_eq!(landing_page("/tasks?status=New"), "/tasks?status=New");
        assert_eq!(landing_page(""), "/home");
        assert_eq!(landing_page("https://evil.example"), "/home");
        assert_eq!(landing_page("//evil.example"), "/home");
    }
}
