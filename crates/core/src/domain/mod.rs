// Domain Layer - Queue entities and identifier parsing

pub mod bookmarklet;
pub mod error;
pub mod item;
pub mod status;

// Re-exports
pub use bookmarklet::BookmarkletRequest;
pub use error::DomainError;
pub use item::{ItemId, ItemState, QueueItem};
pub use status::{RateLimit, StatusSnapshot};
