use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] tiga_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("No todo title provided")]
    EmptyTitle,
    #[error("Edited content cannot be empty")]
    EmptyEditedContent,
    #[error("Invalid date '{0}'; use YYYY-MM-DD or an RFC 3339 timestamp")]
    InvalidDate(String),
    #[error("Unknown folder color '{0}'")]
    UnknownColor(String),
    #[error("Editor command failed: {0}")]
    EditorFailed(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Authentication error: {0}")]
    Auth(String),
    #[error("Not signed in. Run `tiga auth login --email ... --password ...` first.")]
    NotSignedIn,
}
