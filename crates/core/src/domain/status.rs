// Status Snapshot Domain Model

use super::error::{DomainError, Result};
use serde::{Deserialize, Serialize};

/// Point-in-time view of the remote queue's throughput
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    /// Configured cap in KB/s, 0 = unlimited
    pub max_rate_kbps: u32,
    pub current_rate_kbps: f64,
    pub queue_length: u32,
}

impl StatusSnapshot {
    pub fn is_unlimited(&self) -> bool {
        self.max_rate_kbps == 0
    }
}

/// Validated bandwidth cap (KB/s). Zero means unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit(u32);

impl RateLimit {
    pub const UNLIMITED: RateLimit = RateLimit(0);

    pub fn new(kbps: i64) -> Result<Self> {
        if kbps < 0 {
            return Err(DomainError::InvalidRate(format!(
                "rate must be >= 0, got {}",
                kbps
            )));
        }
        u32::try_from(kbps)
            .map(Self)
            .map_err(|_| DomainError::InvalidRate(format!("rate {} is too large", kbps)))
    }

    /// Parse the `maxrate` form field
    pub fn parse(field: &str) -> Result<Self> {
        let kbps: i64 = field
            .trim()
            .parse()
            .map_err(|_| DomainError::InvalidRate(format!("'{}' is not an integer", field)))?;
        Self::new(kbps)
    }

    pub fn kbps(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for RateLimit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0 == 0 {
            write!(f, "unlimited")
        } else {
            write!(f, "{} KB/s", self.0)
        }
    }
}
