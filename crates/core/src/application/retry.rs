// Retry logic for transient transport failures

use crate::port::{methods, CallError, RemoteCall};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Default pause before the single retry
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(250);

/// Retry decision for a failed call
#[derive(Debug, PartialEq, Eq)]
pub enum RetryDecision {
    /// Send the same call again after the delay
    Retry(Duration),
    /// Surface the error as-is
    GiveUp,
}

/// Single-retry policy
///
/// A call is retried at most once, and only when:
/// - the failure is transient (unreachable server or timeout)
/// - the method is idempotent (`enqueuenewzbin` and `dequeue` never are)
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    delay: Duration,
}

impl RetryPolicy {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Decide whether a failed call should be sent again
    ///
    /// # Arguments
    /// * `method` - Remote method name, see [`methods`]
    /// * `attempt` - Number of retries already made for this call (0 on first failure)
    /// * `error` - The failure returned by the transport
    ///
    /// # Example
    /// ```
    /// use hella_core::application::retry::{RetryDecision, RetryPolicy};
    /// use hella_core::port::{methods, CallError};
    /// use std::time::Duration;
    ///
    /// let policy = RetryPolicy::new(Duration::from_millis(10));
    /// assert_eq!(
    ///     policy.decide(methods::LIST, 0, &CallError::Timeout),
    ///     RetryDecision::Retry(Duration::from_millis(10))
    /// );
    /// assert_eq!(
    ///     policy.decide(methods::DEQUEUE, 0, &CallError::Timeout),
    ///     RetryDecision::GiveUp
    /// );
    /// ```
    pub fn decide(&self, method: &str, attempt: u32, error: &CallError) -> RetryDecision {
        if attempt >= 1 || !error.is_transient() || !methods::is_idempotent(method) {
            return RetryDecision::GiveUp;
        }
        RetryDecision::Retry(self.delay)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_RETRY_DELAY)
    }
}

/// `RemoteCall` decorator applying a [`RetryPolicy`]
pub struct RetryingRemote {
    inner: Arc<dyn RemoteCall>,
    policy: RetryPolicy,
}

impl RetryingRemote {
    pub fn new(inner: Arc<dyn RemoteCall>, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

#[async_trait]
impl RemoteCall for RetryingRemote {
    async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value, CallError> {
        let mut attempt = 0;
        loop {
            match self.inner.call(method, params.clone()).await {
                Ok(value) => return Ok(value),
                Err(e) => match self.policy.decide(method, attempt, &e) {
                    RetryDecision::Retry(delay) => {
                        warn!(
                            method = %method,
                            error = %e,
                            delay_ms = delay.as_millis() as u64,
                            "Transient failure, retrying once"
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                    }
                    RetryDecision::GiveUp => return Err(e),
                },
            }
        }
    }
}
