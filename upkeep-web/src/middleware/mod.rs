//! Middleware for the web server
//!
//! - `auth`: the session gate in front of every signed-in route

pub mod auth;
