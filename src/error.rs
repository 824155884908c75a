//! Error taxonomy for influence analysis
//!
//! Only two conditions are hard failures: an anchor that is not a configured
//! prop, and a configuration that cannot produce a well-formed graph. Missing
//! metrics, empty conditioning sets and unreachable targets are absorbed with
//! zero values or empty paths and never surface here.

use thiserror::Error;

/// Errors that can occur while configuring or running an influence analysis
#[derive(Error, Debug)]
pub enum InfluenceError {
    #[error("invalid anchor: '{anchor}' is not a configured prop")]
    InvalidAnchor { anchor: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for influence analysis operations
pub type Result<T> = std::result::Result<T, InfluenceError>;
