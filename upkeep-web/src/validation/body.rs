//! Body extractor

use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::header,
    Form,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use super::{bind, pairs_to_value};
use crate::error::{ApiError, ValidationFailure, INVALID_JSON};

/// Validated JSON or form body
///
/// `application/json` bodies are parsed as JSON; a body that is not valid
/// JSON is rejected with "Invalid JSON syntax" and no violations. Anything
/// else is read as `application/x-www-form-urlencoded`, which is what htmx
/// sends by default.
#[derive(Debug, Clone)]
pub struct ValidatedBody<T>(pub T);

fn is_json(req: &Request) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| {
            let mime = ct.split(';').next().unwrap_or_default().trim();
            mime == "application/json" || mime.ends_with("+json")
        })
        .unwrap_or(false)
}

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedBody<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let value = if is_json(&req) {
            let bytes = Bytes::from_request(req, state)
                .await
                .map_err(|e| ValidationFailure::field("body", e.body_text()))?;
            serde_json::from_slice(&bytes)
                .map_err(|_| ValidationFailure::new(INVALID_JSON, Vec::new()))?
        } else {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|e| ValidationFailure::field("body", e.body_text()))?;
            pairs_to_value(pairs)
        };

        Ok(Self(bind(value)?))
    }
}
