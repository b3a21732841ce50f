// Port Layer - Interfaces for external dependencies

pub mod remote_call;

// Re-exports
pub use remote_call::{fault, methods, CallError, RemoteCall};

#[cfg(test)]
pub use remote_call::MockRemoteCall;
