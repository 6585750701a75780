//! Error types for catalog operations.

use std::path::PathBuf;

use crate::query::QueryError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    #[error("Invalid id: {0}")]
    InvalidId(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Catalog not initialized at {0}")]
    NotInitialized(PathBuf),
}

impl Error {
    /// Whether the caller supplied bad input (as opposed to a lookup miss or
    /// an environment failure).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::Query(_)
                | Error::InvalidId(_)
                | Error::AlreadyExists(_)
                | Error::InvalidDocument(_)
                | Error::Json(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
