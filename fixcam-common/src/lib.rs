//! # Fixcam Common Library
//!
//! Shared code for the fixcam services including:
//! - Error types
//! - Configuration loading (env / TOML / compiled default)
//! - Canonical data-URI handling for stored previews
//! - Entity identifier utilities

pub mod config;
pub mod data_uri;
pub mod error;
pub mod ids;

pub use error::{Error, Result};
