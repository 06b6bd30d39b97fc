//! Signed session cookie values
//!
//! The session cookie carries the signed-in user's identity and an expiry.
//! Every value is stored as a string:
//!
//! ```text
//! {"ID":"7","FirstName":"Ada","LastName":"Lovelace","Email":"ada@example.com",
//!  "Role":"User","ExpiresAt":"2025-03-01T12:00:00+00:00"}
//! ```
//!
//! The cookie value is `hex(json) + "." + hex(HMAC-SHA256(key, json))`. A
//! value that fails signature verification, is missing a field, or has a
//! field that does not parse is rejected as a whole.
//!
//! A session is valid up to and including its expiry instant:
//! `now > expires_at` is the only expired case.

use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::models::user::{Role, User};

type HmacSha256 = Hmac<Sha256>;

/// Cookie name
pub const SESSION_COOKIE: &str = "user-session";

/// How long a login stays valid
pub const SESSION_TTL_HOURS: i64 = 2;

/// Browser-side cookie lifetime (7 days); the signed expiry is what counts
pub const COOKIE_MAX_AGE_SECS: i64 = 7 * 24 * 60 * 60;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("no session cookie")]
    Missing,

    #[error("session cookie is malformed")]
    Malformed,

    #[error("session signature does not match")]
    BadSignature,

    #[error("session is missing {0}")]
    MissingField(&'static str),

    #[error("session field {0} is invalid")]
    InvalidField(&'static str),

    #[error("session expired")]
    Expired,

    #[error("session key rejected: {0}")]
    Key(String),
}

/// Raw session values as stored in the cookie
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionValues {
    #[serde(rename = "ID", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "FirstName", default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(rename = "LastName", default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(rename = "Email", default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "Role", default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(rename = "ExpiresAt", default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
}

/// The signed-in user, as seen by handlers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    pub expires_at: DateTime<Utc>,
}

impl SessionUser {
    /// Starts a session for `user` that expires [`SESSION_TTL_HOURS`] after `now`
    pub fn issue(user: &User, now: DateTime<Utc>) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            role: user.role(),
            expires_at: now + Duration::hours(SESSION_TTL_HOURS),
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn to_values(&self) -> SessionValues {
        SessionValues {
            id: Some(self.id.to_string()),
            first_name: Some(self.first_name.clone()),
            last_name: Some(self.last_name.clone()),
            email: Some(self.email.clone()),
            role: Some(self.role.as_str().to_string()),
            expires_at: Some(self.expires_at.to_rfc3339()),
        }
    }
}

fn required<'a>(value: &'a Option<String>, name: &'static str) -> Result<&'a str, SessionError> {
    match value.as_deref() {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(SessionError::MissingField(name)),
    }
}

impl TryFrom<SessionValues> for SessionUser {
    type Error = SessionError;

    fn try_from(values: SessionValues) -> Result<Self, Self::Error> {
        let id = required(&values.id, "ID")?
            .parse()
            .map_err(|_| SessionError::InvalidField("ID"))?;
        let role = required(&values.role, "Role")?
            .parse()
            .map_err(|_| SessionError::InvalidField("Role"))?;
        let expires_at = DateTime::parse_from_rfc3339(required(&values.expires_at, "ExpiresAt")?)
            .map_err(|_| SessionError::InvalidField("ExpiresAt"))?
            .with_timezone(&Utc);

        Ok(Self {
            id,
            first_name: required(&values.first_name, "FirstName")?.to_string(),
            last_name: required(&values.last_name, "LastName")?.to_string(),
            email: required(&values.email, "Email")?.to_string(),
            role,
            expires_at,
        })
    }
}

/// Signs and verifies cookie values with a server-side key
pub struct SessionCodec {
    key: Vec<u8>,
}

impl SessionCodec {
    pub fn new(key: impl Into<Vec<u8>>) -> Self {
        Self { key: key.into() }
    }

    fn mac(&self) -> Result<HmacSha256, SessionError> {
        HmacSha256::new_from_slice(&self.key).map_err(|e| SessionError::Key(e.to_string()))
    }

    /// Serializes and signs session values
    pub fn encode(&self, values: &SessionValues) -> Result<String, SessionError> {
        let payload = serde_json::to_vec(values).map_err(|_| SessionError::Malformed)?;
        let mut mac = self.mac()?;
        mac.update(&payload);
        let signature = mac.finalize().into_bytes();
        Ok(format!("{}.{}", hex::encode(&payload), hex::encode(signature)))
    }

    /// Verifies the signature and returns the stored values
    pub fn decode(&self, cookie: &str) -> Result<SessionValues, SessionError> {
        let (payload_hex, signature_hex) =
            cookie.split_once('.').ok_or(SessionError::Malformed)?;
        let payload = hex::decode(payload_hex).map_err(|_| SessionError::Malformed)?;
        let signature = hex::decode(signature_hex).map_err(|_| SessionError::Malformed)?;

        let mut mac = self.mac()?;
        mac.update(&payload);
        mac.verify_slice(&signature)
            .map_err(|_| SessionError::BadSignature)?;

        serde_json::from_slice(&payload).map_err(|_| SessionError::Malformed)
    }

    /// Decodes a cookie all the way to a live [`SessionUser`]
    pub fn authenticate(&self, cookie: &str, now: DateTime<Utc>) -> Result<SessionUser, SessionError> {
        let user = SessionUser::try_from(self.decode(cookie)?)?;
        if user.is_expired_at(now) {
            return Err(SessionError::Expired);
        }
        Ok(user)
    }
}
