//! hellanzb SDK - JSON-RPC client for a hellanzb queue daemon
//!
//! Wires the [`hella_core::RemoteCall`](hella_core::port::RemoteCall) port to
//! a JSON-RPC 2.0 HTTP transport.
//!
//! # Example
//!
//! ```no_run
//! use hella_sdk::{HellanzbClient, RemoteConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = HellanzbClient::connect(RemoteConfig::new("http://127.0.0.1:8760"))?;
//!
//!     let id = client.enqueue_from_url("http://v3.newzbin.com/browse/post/3378129/").await?;
//!     println!("Queued: {}", id);
//!
//!     client.set_max_rate(0).await?;
//!     println!("Rate: {:?}", client.status().await?);
//!
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod error;
mod remote;

pub use client::HellanzbClient;
pub use config::{
    RemoteConfig, DEFAULT_RPC_URL, DEFAULT_TIMEOUT_SECS, ENV_RPC_PASSWORD, ENV_RPC_TIMEOUT_SECS,
    ENV_RPC_URL, RPC_USER,
};
pub use error::{Result, SdkError};
pub use hella_core::{QueueControlClient, QueueError};
pub use remote::JsonRpcRemote;
