// Central Error Type for queue control

use crate::domain::DomainError;
use crate::port::{fault, CallError};
use thiserror::Error;

/// Error kinds surfaced to callers of the queue control API.
///
/// Transport-level failures are translated into one of these before they
/// leave `QueueControlClient`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueueError {
    #[error("Remote queue server unavailable: {0}")]
    RemoteUnavailable(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid id: {0}")]
    InvalidId(String),

    #[error("Already queued: {0}")]
    AlreadyQueued(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Remote error ({code}): {message}")]
    Remote { code: i32, message: String },
}

impl QueueError {
    /// Short machine-friendly name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            QueueError::RemoteUnavailable(_) => "remote_unavailable",
            QueueError::NotFound(_) => "not_found",
            QueueError::InvalidArgument(_) => "invalid_argument",
            QueueError::InvalidId(_) => "invalid_id",
            QueueError::AlreadyQueued(_) => "already_queued",
            QueueError::Unauthorized(_) => "unauthorized",
            QueueError::Protocol(_) => "protocol",
            QueueError::Remote { .. } => "remote",
        }
    }
}

/// Result type alias using QueueError
pub type Result<T> = std::result::Result<T, QueueError>;

impl From<DomainError> for QueueError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidId(msg) => QueueError::InvalidId(msg),
            DomainError::InvalidRate(msg) => QueueError::InvalidArgument(msg),
        }
    }
}

// Context-free translation. Callers that know the subject of the call
// (an item id, a rate) refine NotFound/AlreadyQueued messages themselves.
impl From<CallError> for QueueError {
    fn from(err: CallError) -> Self {
        match err {
            CallError::Unreachable(msg) => QueueError::RemoteUnavailable(msg),
            CallError::Timeout => QueueError::RemoteUnavailable("request timed out".to_string()),
            CallError::Decode(msg) => QueueError::Protocol(msg),
            CallError::Rejected { status: status @ (401 | 403) } => {
                QueueError::Unauthorized(format!("server rejected credentials (HTTP {})", status))
            }
            CallError::Rejected { status } => QueueError::Remote {
                code: i32::from(status),
                message: format!("request rejected with HTTP status {}", status),
            },
            CallError::Fault { code, message } => match code {
                fault::INVALID_ARGUMENT => QueueError::InvalidArgument(message),
                fault::NOT_FOUND => QueueError::NotFound(message),
                fault::ALREADY_QUEUED => QueueError::AlreadyQueued(message),
                _ => QueueError::Remote { code, message },
            },
        }
    }
}

impl From<serde_json::Error> for QueueError {
    fn from(err: serde_json::Error) -> Self {
        QueueError::Protocol(err.to_string())
    }
}
