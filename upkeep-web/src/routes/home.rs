/// Dashboard
///
/// ```text
/// GET /home
/// ```
///
/// Greets the signed-in user and shows task counts by status and priority.

use axum::{extract::State, http::HeaderMap, response::Response, Extension};
use upkeep_shared::auth::SessionUser;

use crate::{app::AppState, error::ApiResult, views};

pub async fn home(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let stats = state.services.tasks.stats().await?;
    Ok(views::render(&headers, "Home", views::home::home(&user, &stats)))
}
