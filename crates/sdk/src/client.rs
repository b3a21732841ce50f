//! Hellanzb Client Construction

use crate::config::RemoteConfig;
use crate::error::Result;
use crate::remote::JsonRpcRemote;
use hella_core::application::{RetryPolicy, RetryingRemote};
use hella_core::QueueControlClient;
use std::sync::Arc;
use tracing::info;

/// Entry point for talking to a running queue daemon
///
/// # Example
///
/// ```no_run
/// use hella_sdk::{HellanzbClient, RemoteConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HellanzbClient::connect(RemoteConfig::new("http://127.0.0.1:8760"))?;
/// for item in client.list_queue().await? {
///     println!("{} {}", item.id, item.name);
/// }
/// # Ok(())
/// # }
/// ```
pub struct HellanzbClient;

impl HellanzbClient {
    /// Build a queue control client over JSON-RPC, retrying transient
    /// failures of idempotent calls once
    ///
    /// No request is sent until the first operation.
    ///
    /// # Arguments
    ///
    /// * `config` - Daemon URL, optional password and request timeout
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use hella_sdk::{HellanzbClient, RemoteConfig};
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = RemoteConfig::new("http://127.0.0.1:8760").with_password("changeme");
    /// let client = HellanzbClient::connect(config)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn connect(config: RemoteConfig) -> Result<QueueControlClient> {
        Self::connect_with_policy(config, RetryPolicy::default())
    }

    /// Like [`connect`](Self::connect) with an explicit retry policy
    ///
    /// # Arguments
    ///
    /// * `config` - Daemon URL, optional password and request timeout
    /// * `policy` - When transient failures are retried
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use hella_sdk::{HellanzbClient, RemoteConfig};
    /// # use hella_core::application::RetryPolicy;
    /// # use std::time::Duration;
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = HellanzbClient::connect_with_policy(
    ///     RemoteConfig::new("http://127.0.0.1:8760"),
    ///     RetryPolicy::new(Duration::from_secs(1)),
    /// )?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn connect_with_policy(
        config: RemoteConfig,
        policy: RetryPolicy,
    ) -> Result<QueueControlClient> {
        let remote = JsonRpcRemote::new(&config)?;
        info!(
            url = %config.url,
            timeout_secs = config.timeout.as_secs(),
            auth = config.password.is_some(),
            "Configured hellanzb RPC client"
        );

        let remote = RetryingRemote::new(Arc::new(remote), policy);
        Ok(QueueControlClient::new(Arc::new(remote)))
    }

    /// Same as [`connect`](Self::connect) with configuration read from the environment
    ///
    /// Reads `HELLANZB_RPC_URL`, `HELLANZB_RPC_PASSWORD` and
    /// `HELLANZB_RPC_TIMEOUT_SECS`; unset variables fall back to defaults.
    pub fn from_env() -> Result<QueueControlClient> {
        Self::connect(RemoteConfig::from_env()?)
    }
}
