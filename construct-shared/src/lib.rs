//! # Construct Shared Library
//!
//! Domain types, persistence and business logic for the Construct API.
//!
//! ## Module Organization
//!
//! - `models`: Database models and their queries
//! - `repository`: Storage traits with PostgreSQL and in-memory implementations
//! - `tenant`: Company scoping types
//! - `auth`: Tokens, password hashing, federated identity and request extractors
//! - `services`: Business operations over the repositories
//! - `db`: Connection pool and migrations
//! - `error`: Service error type

pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod tenant;

/// Current version of the Construct shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
