//! # Upkeep shared library
//!
//! Domain and persistence core of the Upkeep maintenance tracker, used by
//! the `upkeep-web` server.
//!
//! ## Module Organization
//!
//! - `models`: domain records, request DTOs and validation rules
//! - `db`: connection pool, migrations and Postgres error translation
//! - `repository`: SQL per entity behind async traits
//! - `service`: request-to-domain mapping and cross-field rules
//! - `auth`: password hashing and signed session values

pub mod auth;
pub mod db;
pub mod models;
pub mod repository;
pub mod service;
