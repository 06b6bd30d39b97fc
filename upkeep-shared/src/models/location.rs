//! Location model
//!
//! Locations form a tree through `parent_location_id` (building > floor >
//! room). Reads join the parent to expose its name.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::rules;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Location {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub parent_location_id: Option<i64>,
    pub parent_location_name: Option<String>,
}

/// Writable columns of a location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationFields {
    pub name: String,
    pub description: String,
    pub parent_location_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct LocationRequest {
    #[validate(custom(function = "rules::not_blank"), length(max = 100))]
    pub name: String,

    pub description: String,

    #[validate(custom(function = "rules::numeric_string"))]
    pub parent_location_id: String,
}

impl LocationRequest {
    pub fn to_domain(&self) -> LocationFields {
        LocationFields {
            name: self.name.trim().to_string(),
            description: self.description.clone(),
            parent_location_id: rules::parse_optional_id(&self.parent_location_id),
        }
    }
}
