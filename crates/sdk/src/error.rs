//! SDK Error Types

use hella_core::port::CallError;
use jsonrpsee::http_client::transport::Error as TransportError;
use thiserror::Error;

/// SDK Result type
pub type Result<T> = std::result::Result<T, SdkError>;

/// SDK Error
#[derive(Debug, Error)]
pub enum SdkError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Map a jsonrpsee client error onto the transport-neutral `CallError`
pub(crate) fn to_call_error(e: jsonrpsee::core::ClientError) -> CallError {
    match e {
        jsonrpsee::core::ClientError::Call(call_err) => CallError::Fault {
            code: call_err.code(),
            message: call_err.message().to_string(),
        },
        // The HTTP transport boxes its error; a non-2xx status means the server
        // was reached and answered, so it is not an outage
        jsonrpsee::core::ClientError::Transport(e) => match e.downcast_ref::<TransportError>() {
            Some(TransportError::Rejected { status_code }) => CallError::Rejected {
                status: *status_code,
            },
            _ => CallError::Unreachable(e.to_string()),
        },
        jsonrpsee::core::ClientError::RestartNeeded(_) => {
            CallError::Unreachable("Connection restart needed".to_string())
        }
        jsonrpsee::core::ClientError::RequestTimeout => CallError::Timeout,
        jsonrpsee::core::ClientError::ParseError(e) => CallError::Decode(e.to_string()),
        other => CallError::Decode(other.to_string()),
    }
}
