//! Remote collaborator error types

use thiserror::Error;

/// Errors reported by the management service collaborators
#[derive(Error, Debug)]
pub enum RemoteError {
    /// Could not reach the service
    #[error("Transport error: {0}")]
    Transport(String),

    /// Service answered with a failure status
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Service refused the write
    #[error("Update rejected: {0}")]
    Rejected(String),

    /// Response body could not be decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl RemoteError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: message.into(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }
}

pub type RemoteResult<T> = Result<T, RemoteError>;
