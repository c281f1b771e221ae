//! Shared error type for the fixcam services
//!
//! Store and config code below the route layer speaks this type; the
//! service crate translates it into its own taxonomy at the boundary.
//! NotFound is load-bearing: partial updates that match zero rows report
//! it so handlers can answer 404 instead of silently succeeding.

use thiserror::Error;

/// Result type for store and config operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Config file unreadable or unparseable, or a required key absent
    #[error("Configuration error: {0}")]
    Config(String),

    /// Project or sub-entity the caller addressed does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Client-supplied value rejected before any work was done
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Stored data failed to round-trip (corrupt JSON column, bad timestamp)
    #[error("Internal error: {0}")]
    Internal(String),
}
