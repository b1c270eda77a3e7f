use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    /// The relay answered with something that breaks the wire contract.
    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("No schema supplied on URL. ({0})")]
    InvalidUrl(String),

    #[error("File does not exist. ({})", .0.display())]
    FileMissing(PathBuf),

    #[error("Path is not a file. ({})", .0.display())]
    NotAFile(PathBuf),

    #[error("File can not be read. ({})", .0.display())]
    Unreadable(PathBuf),
}

impl RelayError {
    pub fn protocol(msg: impl Into<String>) -> Self {
        RelayError::Protocol(msg.into())
    }
}

impl From<serde_json::Error> for RelayError {
    fn from(e: serde_json::Error) -> Self {
        RelayError::Protocol(format!("invalid json: {}", e))
    }
}
