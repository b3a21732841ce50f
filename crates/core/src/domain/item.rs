// Queue Item Domain Model

use super::error::{DomainError, Result};
use serde::{Deserialize, Serialize};

/// Identifier of a queued NZB, as assigned by the remote queue server.
///
/// Values received from the server are taken as-is; values coming from
/// user input go through [`ItemId::parse`] or [`ItemId::from_composite`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Validate a bare identifier: non-empty, ASCII alphanumerics and `-` only
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(DomainError::InvalidId("empty identifier".to_string()));
        }
        if !raw.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(DomainError::InvalidId(format!(
                "'{}' must contain only alphanumeric characters or '-'",
                raw
            )));
        }
        Ok(Self(raw.to_string()))
    }

    /// Extract the id from a `"<prefix>_<id>"` composite, as posted by the queue page
    ///
    /// The id is the second `_`-separated field, so `"q_7"` and `"nzb_7_row"`
    /// both yield `"7"`.
    pub fn from_composite(composite: &str) -> Result<Self> {
        let field = composite.split('_').nth(1).ok_or_else(|| {
            DomainError::InvalidId(format!("'{}' is not a <prefix>_<id> composite", composite))
        })?;
        Self::parse(field)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Download state of a queued NZB
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemState {
    Queued,
    Downloading,
    Paused,
}

impl std::fmt::Display for ItemState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemState::Queued => write!(f, "QUEUED"),
            ItemState::Downloading => write!(f, "DOWNLOADING"),
            ItemState::Paused => write!(f, "PAUSED"),
        }
    }
}

/// A job in the remote download queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueItem {
    pub id: ItemId,
    pub name: String,
    pub size_bytes: u64,
    pub state: ItemState,
    pub position: u32,
}

impl QueueItem {
    /// Size in megabytes, for display
    pub fn size_mb(&self) -> f64 {
        self.size_bytes as f64 / (1024.0 * 1024.0)
    }
}
