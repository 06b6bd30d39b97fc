//! Path and query extractors

use async_trait::async_trait;
use axum::{
    extract::{
        path::ErrorKind,
        rejection::PathRejection,
        FromRequestParts, Path, Query,
    },
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use super::messages::{expected_type_message, type_name};
use super::{bind, pairs_to_value};
use crate::error::{ApiError, ValidationFailure};

/// Validated path parameters
///
/// Bind into a struct whose field names match the route's `:params`. A
/// parameter that does not parse is reported under its own name:
///
/// ```text
/// PUT /categories/abc  ->  {"name": "id", "message": "Expected type <integer>"}
/// ```
#[derive(Debug, Clone)]
pub struct ValidatedPath<T>(pub T);

fn path_failure(kind: &ErrorKind) -> ValidationFailure {
    match kind {
        ErrorKind::ParseErrorAtKey {
            key, expected_type, ..
        } => ValidationFailure::field(key.clone(), expected_type_message(&type_name(expected_type), None)),
        ErrorKind::ParseErrorAtIndex {
            index,
            expected_type,
            ..
        } => ValidationFailure::field(
            format!("[{}]", index),
            expected_type_message(&type_name(expected_type), None),
        ),
        ErrorKind::ParseError { expected_type, .. } => ValidationFailure::field(
            "path",
            expected_type_message(&type_name(expected_type), None),
        ),
        other => ValidationFailure::field("path", format!("Path parameter error: {}", other)),
    }
}

#[async_trait]
impl<T, S> FromRequestParts<S> for ValidatedPath<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(data) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| match rejection {
                PathRejection::FailedToDeserializePathParams(e) => {
                    ApiError::Validation(path_failure(e.kind()))
                }
                other => ApiError::Internal(other.body_text()),
            })?;

        super::check(&data)?;
        Ok(Self(data))
    }
}

/// Validated query string
///
/// Values arrive as strings; numeric fields use the lenient deserializers
/// from `upkeep_shared::models::rules::de`.
#[derive(Debug, Clone)]
pub struct ValidatedQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::from_request_parts(parts, state)
            .await
            .map_err(|e| ValidationFailure::field("query", e.body_text()))?;

        Ok(Self(bind(pairs_to_value(pairs))?))
    }
}
