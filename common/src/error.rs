//! Error types

use thiserror::Error;

/// Shared error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Taxonomy error: {0}")]
    Taxonomy(String),

    #[error("Keyword pattern error: {0}")]
    Pattern(#[from] regex::Error),
}

/// Result alias
pub type Result<T> = std::result::Result<T, Error>;
