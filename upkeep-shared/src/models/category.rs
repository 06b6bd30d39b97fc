//! Category model
//!
//! Categories group tasks by trade (plumbing, electrical, ...). Names are
//! unique.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::rules;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: String,
}

/// Writable columns of a category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryFields {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct CategoryRequest {
    #[validate(custom(function = "rules::not_blank"), length(max = 100))]
    pub name: String,

    pub description: String,
}

impl CategoryRequest {
    pub fn to_domain(&self) -> CategoryFields {
        CategoryFields {
            name: self.name.trim().to_string(),
            description: self.description.clone(),
        }
    }
}
