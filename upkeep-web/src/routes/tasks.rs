/// Task endpoints
///
/// ```text
/// POST   /tasks                -> 201 {"id": n}
/// GET    /tasks                -> list fragment, filtered by query string
/// GET    /tasks/form           -> create form
/// GET    /tasks/:id/form       -> edit form
/// PUT    /tasks/:id            -> 200
/// DELETE /tasks/:id            -> 204
/// PUT    /tasks/:id/status     -> 204, body {status}
/// PUT    /tasks/:id/assign     -> 204, body {assigned_to}; blank unassigns
/// POST   /tasks/:id/complete   -> 204
/// GET    /tasks/select         -> parent picker
/// ```
///
/// List filters (all optional):
///
/// ```text
/// status, priority, category_id, location_id, assigned_to, created_by,
/// is_completed, is_recurring, search, date_from, date_to,
/// sort_field, sort_order, limit, offset
/// ```

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Response,
    Extension,
};
use serde::Deserialize;
use upkeep_shared::{
    auth::SessionUser,
    models::{
        rules::de, task::UnknownVariant, AssignRequest, StatusRequest, TaskFilters, TaskRequest,
        TaskStatus,
    },
};
use validator::Validate;

use super::{created, refresh, IdParam};
use crate::{
    app::AppState,
    error::{ApiResult, ValidationFailure},
    validation::{ValidatedBody, ValidatedPath, ValidatedQuery},
    views,
};

/// `?task_id=` or `?parent_task_id=` preselects, `?excluded_id=` hides
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct SelectQuery {
    #[serde(deserialize_with = "de::blank_as_none")]
    pub task_id: Option<i64>,
    #[serde(deserialize_with = "de::blank_as_none")]
    pub parent_task_id: Option<i64>,
    #[serde(deserialize_with = "de::blank_as_none")]
    pub excluded_id: Option<i64>,
}

pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    ValidatedBody(request): ValidatedBody<TaskRequest>,
) -> ApiResult<Response> {
    let task = state.services.tasks.create(user.id, &request).await?;
    Ok(created(task.id))
}

pub async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
    ValidatedQuery(filters): ValidatedQuery<TaskFilters>,
) -> ApiResult<Response> {
    let tasks = state.services.tasks.get_all(&filters).await?;
    tracing::debug!(count = tasks.len(), "Tasks listed");
    Ok(views::render(&headers, "Tasks", views::tasks::list(&tasks, &filters)))
}

pub async fn form(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Response> {
    let users = state.services.users.list().await?;
    Ok(views::render(&headers, "New task", views::tasks::form(None, &users)))
}

pub async fn edit_form(
    State(state): State<AppState>,
    headers: HeaderMap,
    ValidatedPath(IdParam { id }): ValidatedPath<IdParam>,
) -> ApiResult<Response> {
    let task = state.services.tasks.get_by_id(id).await?;
    let users = state.services.users.list().await?;
    Ok(views::render(&headers, "Edit task", views::tasks::form(Some(&task), &users)))
}

pub async fn update(
    State(state): State<AppState>,
    ValidatedPath(IdParam { id }): ValidatedPath<IdParam>,
    ValidatedBody(request): ValidatedBody<TaskRequest>,
) -> ApiResult<Response> {
    state.services.tasks.update(id, &request).await?;
    tracing::info!(task_id = id, "Task updated");
    Ok(refresh(StatusCode::OK))
}

pub async fn delete(
    State(state): State<AppState>,
    ValidatedPath(IdParam { id }): ValidatedPath<IdParam>,
) -> ApiResult<Response> {
    state.services.tasks.delete(id).await?;
    tracing::info!(task_id = id, "Task deleted");
    Ok(refresh(StatusCode::NO_CONTENT))
}

pub async fn update_status(
    State(state): State<AppState>,
    ValidatedPath(IdParam { id }): ValidatedPath<IdParam>,
    ValidatedBody(request): ValidatedBody<StatusRequest>,
) -> ApiResult<Response> {
    let status: TaskStatus = request
        .status
        .parse()
        .map_err(|e: UnknownVariant| ValidationFailure::field("status", e.to_string()))?;

    state.services.tasks.update_status(id, status).await?;
    tracing::info!(task_id = id, status = %status, "Task status changed");
    Ok(refresh(StatusCode::NO_CONTENT))
}

pub async fn assign(
    State(state): State<AppState>,
    ValidatedPath(IdParam { id }): ValidatedPath<IdParam>,
    ValidatedBody(request): ValidatedBody<AssignRequest>,
) -> ApiResult<Response> {
    state.services.tasks.assign(id, &request).await?;
    tracing::info!(task_id = id, assigned_to = %request.assigned_to, "Task assigned");
    Ok(refresh(StatusCode::NO_CONTENT))
}

pub async fn complete(
    State(state): State<AppState>,
    ValidatedPath(IdParam { id }): ValidatedPath<IdParam>,
) -> ApiResult<Response> {
    state.services.tasks.complete(id).await?;
    tracing::info!(task_id = id, "Task completed");
    Ok(refresh(StatusCode::NO_CONTENT))
}

pub async fn select(
    State(state): State<AppState>,
    headers: HeaderMap,
    ValidatedQuery(query): ValidatedQuery<SelectQuery>,
) -> ApiResult<Response> {
    let tasks = state.services.tasks.get_all(&TaskFilters::default()).await?;
    Ok(views::render(
        &headers,
        "Tasks",
        views::tasks::select(&tasks, query.parent_task_id.or(query.task_id), query.excluded_id),
    ))
}
