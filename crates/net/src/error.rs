//! Network error types

use std::io;

use hotelier_core::FieldErrors;

/// Network result type
pub type Result<T> = std::result::Result<T, Error>;

/// Network errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Connection closed")]
    ConnectionClosed,

    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The store refused the request
    #[error("{message}")]
    Remote { message: String, fields: FieldErrors },

    /// The store failed while handling the request
    #[error("Server error: {0}")]
    Server(String),

    #[error("Not connected")]
    NotConnected,
}
