//! User model
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE users (
//!     id BIGSERIAL PRIMARY KEY,
//!     first_name VARCHAR(100) NOT NULL,
//!     last_name VARCHAR(100) NOT NULL,
//!     email VARCHAR(255) NOT NULL UNIQUE,
//!     password_hash TEXT NOT NULL,
//!     role VARCHAR(20) NOT NULL DEFAULT 'User',
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use super::rules;
use super::task::UnknownVariant;

/// Access level of an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Administrator,
    User,
}

impl Role {
    pub const fn as_str(self) -> &'static str {
        match self {
            Role::Administrator => "Administrator",
            Role::User => "User",
        }
    }
}

impl FromStr for Role {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Administrator" => Ok(Role::Administrator),
            "User" => Ok(Role::User),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user account
///
/// Passwords are stored as Argon2id hashes and never serialized.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,

    #[serde(skip_serializing)]
    pub password_hash: String,

    /// `Administrator` or `User`
    pub role: String,

    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn role(&self) -> Role {
        self.role.parse().unwrap_or(Role::User)
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Columns written when an account is created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// Registration form
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct UserRequest {
    #[validate(custom(function = "rules::not_blank"), length(max = 100))]
    pub first_name: String,

    #[validate(custom(function = "rules::not_blank"), length(max = 100))]
    pub last_name: String,

    #[validate(custom(function = "rules::not_blank"), email)]
    pub email: String,

    #[validate(custom(function = "rules::not_blank"))]
    pub password: String,
}

impl UserRequest {
    /// Builds the account row; new accounts always get the `User` role
    pub fn to_domain(&self, password_hash: String) -> CreateUser {
        CreateUser {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            password_hash,
            role: Role::User,
        }
    }
}

/// Login form
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct LoginRequest {
    #[validate(custom(function = "rules::not_blank"), email)]
    pub email: String,

    #[validate(custom(function = "rules::not_blank"))]
    pub password: String,

    /// Page the user was on before being sent to the login form
    pub original_url: String,
}
