//! Request binding and validation
//!
//! Extractors that bind a request into a typed struct, run its `validator`
//! rules, and reject with [`ApiError::Validation`](crate::error::ApiError)
//! when anything is off:
//!
//! - [`ValidatedBody`]: JSON or URL-encoded form bodies
//! - [`ValidatedPath`]: path parameters such as `/:id`
//! - [`ValidatedQuery`]: query strings
//!
//! Every input is first turned into a `serde_json::Value` and then decoded
//! with `serde_path_to_error`, so a type mismatch can be reported against
//! the exact field that caused it.

mod body;
pub mod messages;
mod params;

pub use body::ValidatedBody;
pub use params::{ValidatedPath, ValidatedQuery};

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use validator::Validate;

use crate::error::{ValidationFailure, Violation, VALIDATION_FAILED};
use messages::{collect_violations, describe_decode_error, missing_field};

/// Builds a JSON object from form or query pairs; later keys win
pub(crate) fn pairs_to_value(pairs: Vec<(String, String)>) -> Value {
    let map: Map<String, Value> = pairs
        .into_iter()
        .map(|(k, v)| (k, Value::String(v)))
        .collect();
    Value::Object(map)
}

/// Decodes `value` into `T`, naming the field on failure
pub(crate) fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ValidationFailure> {
    serde_path_to_error::deserialize(value).map_err(|err| {
        let path = err.path().to_string();
        let raw = err.into_inner().to_string();
        let name = match (path.as_str(), missing_field(&raw)) {
            (".", Some(field)) => field.to_string(),
            (".", None) => "body".to_string(),
            (_, Some(field)) => format!("{}.{}", path, field),
            (_, None) => path,
        };
        let message = describe_decode_error(&raw);
        ValidationFailure::new(VALIDATION_FAILED, vec![Violation::new(name, message)])
    })
}

/// Runs the struct's rules
pub(crate) fn check<T: Validate>(data: &T) -> Result<(), ValidationFailure> {
    data.validate()
        .map_err(|errors| ValidationFailure::new(VALIDATION_FAILED, collect_violations(&errors)))
}

/// Decode then validate
pub(crate) fn bind<T: DeserializeOwned + Validate>(value: Value) -> Result<T, ValidationFailure> {
    let data = decode::<T>(value)?;
    check(&data)?;
    Ok(data)
}
