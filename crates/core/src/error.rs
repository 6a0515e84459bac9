//! Error types for Hotelier Core

use thiserror::Error;

use crate::validation::FieldErrors;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Errors caused by the request itself rather than by the store
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Error::NotFound(_) | Error::InvalidOperation(_) | Error::Validation(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
