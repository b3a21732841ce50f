// hellanzb-remote Core - Domain Logic & Ports
// NO transport dependencies: the remote queue server is reached only through port::RemoteCall

pub mod application;
pub mod domain;
pub mod error;
pub mod port;

pub use application::{Controller, QueueControlClient};
pub use error::{QueueError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
