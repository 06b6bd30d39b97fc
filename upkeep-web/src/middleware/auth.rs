//! Session auth gate
//!
//! Wraps every route that needs a signed-in user:
//!
//! ```text
//! request -> read `user-session` cookie -> verify signature -> parse fields
//!         -> now > expires_at ? 401 login view : insert SessionUser -> handler
//! ```
//!
//! Handlers read the user with `Extension<SessionUser>`.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Utc};
use upkeep_shared::auth::{
    session::COOKIE_MAX_AGE_SECS, SessionCodec, SessionError, SessionUser, SESSION_COOKIE,
};

use crate::{app::AppState, views};

/// Value of the cookie `name` from the `Cookie` request headers
pub fn read_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

/// Resolves the session carried by `headers` as of `now`
///
/// # Errors
///
/// Any [`SessionError`]: no cookie, bad signature, a missing or unparseable
/// field, or an expiry before `now`.
pub fn authenticate(
    codec: &SessionCodec,
    headers: &HeaderMap,
    now: DateTime<Utc>,
) -> Result<SessionUser, SessionError> {
    let cookie = read_cookie(headers, SESSION_COOKIE).ok_or(SessionError::Missing)?;
    codec.authenticate(cookie, now)
}

/// `Set-Cookie` value carrying a signed session
pub fn session_cookie(value: &str, secure: bool) -> String {
    cookie(value, COOKIE_MAX_AGE_SECS, secure)
}

/// `Set-Cookie` value that removes the session
pub fn clear_session_cookie(secure: bool) -> String {
    cookie("", 0, secure)
}

fn cookie(value: &str, max_age: i64, secure: bool) -> String {
    let mut out = format!(
        "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Strict",
        SESSION_COOKIE, value, max_age
    );
    if secure {
        out.push_str("; Secure");
    }
    out
}

/// Middleware for `from_fn_with_state`
///
/// Rejected requests get the login view with 401; the original URL is kept
/// so the user lands back where they were after signing in.
pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    match authenticate(&state.sessions, req.headers(), Utc::now()) {
        Ok(user) => {
            tracing::debug!(user_id = user.id, "Session accepted");
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        Err(err) => {
            let original_url = req
                .uri()
                .path_and_query()
                .map(|pq| pq.as_str().to_string())
                .unwrap_or_default();
            tracing::warn!(error = %err, path = %original_url, "Unauthorized access");

            views::render_with_status(
                StatusCode::UNAUTHORIZED,
                req.headers(),
                "Sign in",
                views::auth::login("", &original_url, None),
            )
        }
    }
}
