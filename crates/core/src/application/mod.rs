// Application Layer - Use cases on top of the RemoteCall port

pub mod controller;
pub mod pipeline;
pub mod queue_control;
pub mod retry;

// Re-exports
pub use controller::{Controller, Handled, Response};
pub use pipeline::{Action, AllowAll, Authorizer, Pipeline, Request, SharedSecret, ViewDefaults};
pub use queue_control::QueueControlClient;
pub use retry::{RetryPolicy, RetryingRemote};
