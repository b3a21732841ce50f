//! Connection Configuration
//!
//! Read from the environment with defaults, the same way for the CLI and for
//! embedders.

use crate::error::{Result, SdkError};
use std::time::Duration;

pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8760";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User name the queue daemon expects for HTTP basic auth
pub const RPC_USER: &str = "hellanzb";

pub const ENV_RPC_URL: &str = "HELLANZB_RPC_URL";
pub const ENV_RPC_PASSWORD: &str = "HELLANZB_RPC_PASSWORD";
pub const ENV_RPC_TIMEOUT_SECS: &str = "HELLANZB_RPC_TIMEOUT_SECS";

/// Where and how to reach the queue daemon
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    pub url: String,
    pub password: Option<String>,
    pub timeout: Duration,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_RPC_URL.to_string(),
            password: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl RemoteConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load from `HELLANZB_RPC_URL`, `HELLANZB_RPC_PASSWORD` and
    /// `HELLANZB_RPC_TIMEOUT_SECS`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_RPC_URL).filter(|s| !s.trim().is_empty()) {
            config.url = url;
        }
        config.password = lookup(ENV_RPC_PASSWORD).filter(|s| !s.is_empty());

        if let Some(raw) = lookup(ENV_RPC_TIMEOUT_SECS) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                SdkError::InvalidConfig(format!("{} must be a number, got '{}'", ENV_RPC_TIMEOUT_SECS, raw))
            })?;
            if secs == 0 {
                return Err(SdkError::InvalidConfig(format!(
                    "{} must be greater than zero",
                    ENV_RPC_TIMEOUT_SECS
                )));
            }
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Err(SdkError::InvalidUrl(format!(
                "'{}' must start with http:// or https://",
                self.url
            )));
        }
        Ok(())
    }
}
