//! Authentication primitives
//!
//! - [`password`]: Argon2id hashing for stored credentials
//! - [`session`]: signed session cookie values and expiry checks

pub mod password;
pub mod session;

pub use session::{SessionCodec, SessionError, SessionUser, SessionValues, SESSION_COOKIE};
