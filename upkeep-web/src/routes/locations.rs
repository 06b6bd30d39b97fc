/// Location endpoints
///
/// ```text
/// POST   /locations           -> 201 {"id": n}
/// GET    /locations           -> list fragment
/// GET    /locations/form      -> create form
/// GET    /locations/:id/form  -> edit form
/// PUT    /locations/:id       -> 204
/// DELETE /locations/:id       -> 204
/// GET    /locations/select    -> <select>, ?location_id= preselects, ?excluded_id= hides,
///                                 ?field= names the input (default location_id)
/// ```

use axum::{extract::State, http::{HeaderMap, StatusCode}, response::Response};
use serde::Deserialize;
use upkeep_shared::models::{rules::de, LocationRequest};
use validator::{Validate, ValidationError};

use super::{created, refresh, IdParam};
use crate::{
    app::AppState,
    error::ApiResult,
    validation::{ValidatedBody, ValidatedPath, ValidatedQuery},
    views,
};

#[derive(Debug, Deserialize, Validate)]
#[serde(default)]
pub struct SelectQuery {
    #[validate(custom(function = "select_field"))]
    pub field: String,
    #[serde(deserialize_with = "de::blank_as_none")]
    pub location_id: Option<i64>,
    #[serde(deserialize_with = "de::blank_as_none")]
    pub excluded_id: Option<i64>,
}

impl Default for SelectQuery {
    fn default() -> Self {
        Self {
            field: "location_id".to_string(),
            location_id: None,
            excluded_id: None,
        }
    }
}

fn select_field(field: &str) -> Result<(), ValidationError> {
    match field {
        "location_id" | "parent_location_id" => Ok(()),
        _ => {
            let mut err = ValidationError::new("oneof");
            err.message = Some("Should be one of: location_id, parent_location_id".into());
            Err(err)
        }
    }
}

pub async fn create(
    State(state): State<AppState>,
    ValidatedBody(request): ValidatedBody<LocationRequest>,
) -> ApiResult<Response> {
    let location = state.services.locations.create(&request).await?;
    tracing::info!(location_id = location.id, "Location created");
    Ok(created(location.id))
}

pub async fn list(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Response> {
    let locations = state.services.locations.get_all().await?;
    Ok(views::render(&headers, "Locations", views::locations::list(&locations)))
}

pub async fn form(headers: HeaderMap) -> Response {
    views::render(&headers, "New location", views::locations::form(None))
}

pub async fn edit_form(
    State(state): State<AppState>,
    headers: HeaderMap,
    ValidatedPath(IdParam { id }): ValidatedPath<IdParam>,
) -> ApiResult<Response> {
    let location = state.services.locations.get_by_id(id).await?;
    Ok(views::render(&headers, "Edit location", views::locations::form(Some(&location))))
}

pub async fn update(
    State(state): State<AppState>,
    ValidatedPath(IdParam { id }): ValidatedPath<IdParam>,
    ValidatedBody(request): ValidatedBody<LocationRequest>,
) -> ApiResult<Response> {
    state.services.locations.update(id, &request).await?;
    tracing::info!(location_id = id, "Location updated");
    Ok(refresh(StatusCode::NO_CONTENT))
}

pub async fn delete(
    State(state): State<AppState>,
    ValidatedPath(IdParam { id }): ValidatedPath<IdParam>,
) -> ApiResult<Response> {
    state.services.locations.delete(id).await?;
    tracing::info!(location_id = id, "Location deleted");
    Ok(refresh(StatusCode::NO_CONTENT))
}

pub async fn select(
    State(state): State<AppState>,
    headers: HeaderMap,
    ValidatedQuery(query): ValidatedQuery<SelectQuery>,
) -> ApiResult<Response> {
    let locations = state.services.locations.get_all().await?;
    Ok(views::render(
        &headers,
        "Locations",
        views::locations::select(&locations, &query.field, query.location_id, query.excluded_id),
    ))
}
