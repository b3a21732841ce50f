// Remote Call Port (Interface)
//
// The queue engine lives in a separate server process. Everything this crate
// knows about it goes through `call(method, params) -> value`.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Remote method names understood by the queue server
pub mod methods {
    pub const ASCIIART: &str = "asciiart";
    pub const DEQUEUE: &str = "dequeue";
    pub const MAXRATE: &str = "maxrate";
    pub const ENQUEUE_NEWZBIN: &str = "enqueuenewzbin";
    // Not confirmed against the server; see DESIGN.md
    pub const LIST: &str = "list";
    pub const STATUS: &str = "status";

    /// Methods that can be re-sent after a transport failure without
    /// changing the outcome
    ///
    /// `dequeue` and `enqueuenewzbin` are excluded: if the first request was
    /// applied but its reply lost, a resend answers `NotFound` or
    /// `AlreadyQueued` for an operation that actually succeeded.
    pub fn is_idempotent(method: &str) -> bool {
        matches!(method, ASCIIART | MAXRATE | LIST | STATUS)
    }
}

/// Application fault codes returned by the queue server
pub mod fault {
    pub const INVALID_ARGUMENT: i32 = 4000;
    pub const NOT_FOUND: i32 = 4001;
    pub const ALREADY_QUEUED: i32 = 4002;
    pub const INTERNAL: i32 = 5000;
}

/// Transport-neutral failure of a single remote call
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CallError {
    #[error("server unreachable: {0}")]
    Unreachable(String),

    #[error("request timed out")]
    Timeout,

    #[error("fault ({code}): {message}")]
    Fault { code: i32, message: String },

    #[error("undecodable response: {0}")]
    Decode(String),

    /// The transport answered with a non-success HTTP status
    #[error("request rejected with HTTP status {status}")]
    Rejected { status: u16 },
}

impl CallError {
    /// Failures where the request may never have reached the server
    pub fn is_transient(&self) -> bool {
        matches!(self, CallError::Unreachable(_) | CallError::Timeout)
    }

    /// The server refused the caller's credentials
    pub fn is_auth_rejection(&self) -> bool {
        matches!(self, CallError::Rejected { status: 401 | 403 })
    }
}

/// Remote procedure call interface to the queue server
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteCall: Send + Sync {
    /// Invoke `method` with positional `params`
    async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value, CallError>;
}
