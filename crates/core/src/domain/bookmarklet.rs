// Bookmarklet Request - ephemeral, only used to derive an enqueue id

use super::error::{DomainError, Result};
use super::item::ItemId;

/// A URL submitted from the browser bookmarklet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookmarkletRequest {
    pub source_url: String,
}

impl BookmarkletRequest {
    pub fn new(source_url: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
        }
    }

    /// The final non-empty path segment of the source URL
    ///
    /// Only the structure of the URL is inspected; the host is not checked.
    /// Strings that do not parse as absolute URLs are split on `/` directly.
    pub fn item_id(&self) -> Result<ItemId> {
        let segment = match url::Url::parse(&self.source_url) {
            Ok(parsed) => parsed
                .path_segments()
                .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
                .map(str::to_string),
            Err(_) => self
                .source_url
                .split('/')
                .filter(|s| !s.is_empty())
                .last()
                .map(str::to_string),
        };

        let segment = segment.ok_or_else(|| {
            DomainError::InvalidId(format!("no path segment in '{}'", self.source_url))
        })?;
        ItemId::parse(&segment)
    }
}
