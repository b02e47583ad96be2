//! Error types for tiga-core

use thiserror::Error;

use crate::models::TodoId;

/// Result type alias using tiga-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in tiga-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Remote API rejected the request
    #[error("API error: {0}")]
    Api(String),

    /// Session is missing or expired; the caller must re-authenticate
    #[error("Not authenticated: {0}")]
    Unauthenticated(String),

    /// Row not found
    #[error("Todo not found: {0}")]
    NotFound(TodoId),

    /// Operation addressed a placeholder row that has no server id yet
    #[error("Todo {0} is not yet created on the server")]
    NotYetCreated(TodoId),

    /// Another write for the same logical action is still in flight
    #[error("A submission is already in progress")]
    SubmissionInFlight,

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
