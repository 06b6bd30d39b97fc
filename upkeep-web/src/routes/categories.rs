/// Category endpoints
///
/// ```text
/// POST   /categories           -> 201 {"id": n}
/// GET    /categories           -> list fragment
/// GET    /categories/form      -> create form
/// GET    /categories/:id/form  -> edit form
/// PUT    /categories/:id       -> 204
/// DELETE /categories/:id       -> 204
/// GET    /categories/select    -> <select>, ?category_id= preselects
/// ```

use axum::{extract::State, http::{HeaderMap, StatusCode}, response::Response};
use serde::Deserialize;
use upkeep_shared::models::{rules::de, CategoryRequest};
use validator::Validate;

use super::{created, refresh, IdParam};
use crate::{
    app::AppState,
    error::ApiResult,
    validation::{ValidatedBody, ValidatedPath, ValidatedQuery},
    views,
};

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct SelectQuery {
    #[serde(deserialize_with = "de::blank_as_none")]
    pub category_id: Option<i64>,
}

pub async fn create(
    State(state): State<AppState>,
    ValidatedBody(request): ValidatedBody<CategoryRequest>,
) -> ApiResult<Response> {
    let category = state.services.categories.create(&request).await?;
    tracing::info!(category_id = category.id, "Category created");
    Ok(created(category.id))
}

pub async fn list(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Response> {
    let categories = state.services.categories.get_all().await?;
    Ok(views::render(&headers, "Categories", views::categories::list(&categories)))
}

pub async fn form(headers: HeaderMap) -> Response {
    views::render(&headers, "New category", views::categories::form(None))
}

pub async fn edit_form(
    State(state): State<AppState>,
    headers: HeaderMap,
    ValidatedPath(IdParam { id }): ValidatedPath<IdParam>,
) -> ApiResult<Response> {
    let category = state.services.categories.get_by_id(id).await?;
    Ok(views::render(&headers, "Edit category", views::categories::form(Some(&category))))
}

pub async fn update(
    State(state): State<AppState>,
    ValidatedPath(IdParam { id }): ValidatedPath<IdParam>,
    ValidatedBody(request): ValidatedBody<CategoryRequest>,
) -> ApiResult<Response> {
    state.services.categories.update(id, &request).await?;
    tracing::info!(category_id = id, "Category updated");
    Ok(refresh(StatusCode::NO_CONTENT))
}

pub async fn delete(
    State(state): State<AppState>,
    ValidatedPath(IdParam { id }): ValidatedPath<IdParam>,
) -> ApiResult<Response> {
    state.services.categories.delete(id).await?;
    tracing::info!(category_id = id, "Category deleted");
    Ok(refresh(StatusCode::NO_CONTENT))
}

pub async fn select(
    State(state): State<AppState>,
    headers: HeaderMap,
    ValidatedQuery(query): ValidatedQuery<SelectQuery>,
) -> ApiResult<Response> {
    let categories = state.services.categories.get_all().await?;
    Ok(views::render(
        &headers,
        "Categories",
        views::categories::select(&categories, query.category_id),
    ))
}
