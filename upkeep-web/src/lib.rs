//! # Upkeep Web Server Library
//!
//! HTTP surface of the Upkeep maintenance tracker: server-rendered pages and
//! htmx fragments over the `upkeep-shared` services.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `middleware`: Session auth gate
//! - `routes`: Route handlers
//! - `validation`: Request binding and validation extractors
//! - `views`: HTML pages and fragments

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod validation;
pub mod views;
