// Queue Control Client - typed intents in, typed results out
//
// Stateless pass-through to the remote queue server apart from the status
// snapshot cache, which is only ever cleared explicitly or by a mutating call.

use crate::domain::{BookmarkletRequest, ItemId, QueueItem, RateLimit, StatusSnapshot};
use crate::error::{QueueError, Result};
use crate::port::{fault, methods, CallError, RemoteCall};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Client for the remote download queue
pub struct QueueControlClient {
    remote: Arc<dyn RemoteCall>,
    status_cache: Mutex<Option<StatusSnapshot>>,
}

impl QueueControlClient {
    pub fn new(remote: Arc<dyn RemoteCall>) -> Self {
        Self {
            remote,
            status_cache: Mutex::new(None),
        }
    }

    /// Current queue contents, ordered by queue position
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use hella_core::QueueControlClient;
    /// # async fn example(client: &QueueControlClient) -> hella_core::Result<()> {
    /// for item in client.list_queue().await? {
    ///     println!("{} {} {:.1} MB", item.position, item.name, item.size_mb());
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn list_queue(&self) -> Result<Vec<QueueItem>> {
        let mut items: Vec<QueueItem> = self.invoke(methods::LIST, vec![]).await?;
        items.sort_by_key(|item| item.position);
        Ok(items)
    }

    /// Remove an item from the active queue
    ///
    /// An id the server does not know yields `NotFound`; nothing else is touched.
    /// Never retried: a lost reply surfaces as `RemoteUnavailable`.
    ///
    /// # Arguments
    ///
    /// * `id` - Server-assigned item id
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use hella_core::QueueControlClient;
    /// # use hella_core::domain::ItemId;
    /// # async fn example(client: &QueueControlClient) -> hella_core::Result<()> {
    /// let id = ItemId::parse("42")?;
    /// client.dequeue(&id).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn dequeue(&self, id: &ItemId) -> Result<()> {
        let result = self
            .remote
            .call(methods::DEQUEUE, vec![json!(id.as_str())])
            .await
            .map_err(|e| match e {
                CallError::Fault {
                    code: fault::NOT_FOUND,
                    ..
                } => QueueError::NotFound(id.to_string()),
                other => QueueError::from(other),
            })?;

        // Older servers answer `false` instead of faulting
        if result == Value::Bool(false) {
            return Err(QueueError::NotFound(id.to_string()));
        }

        info!(item_id = %id, "Dequeued item");
        self.clear_status_cache().await;
        Ok(())
    }

    /// Dequeue by the `"<prefix>_<id>"` composite posted from the queue page
    ///
    /// # Arguments
    ///
    /// * `composite` - Composite id; the second `_` field is the item id
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use hella_core::QueueControlClient;
    /// # async fn example(client: &QueueControlClient) -> hella_core::Result<()> {
    /// let removed = client.dequeue_composite("q_42").await?;
    /// assert_eq!(removed.as_str(), "42");
    /// # Ok(())
    /// # }
    /// ```
    pub async fn dequeue_composite(&self, composite: &str) -> Result<ItemId> {
        let id = ItemId::from_composite(composite)?;
        self.dequeue(&id).await?;
        Ok(id)
    }

    /// Set the download bandwidth cap in KB/s (0 = unlimited)
    ///
    /// Negative rates fail with `InvalidArgument` before any remote call.
    ///
    /// # Arguments
    ///
    /// * `kbps` - New cap in KB/s
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use hella_core::QueueControlClient;
    /// # async fn example(client: &QueueControlClient) -> hella_core::Result<()> {
    /// let rate = client.set_max_rate(250).await?;
    /// println!("now capped at {}", rate);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn set_max_rate(&self, kbps: i64) -> Result<RateLimit> {
        let rate = RateLimit::new(kbps)?;
        self.apply_rate(rate).await?;
        Ok(rate)
    }

    /// Set the bandwidth cap from the raw `maxrate` form field
    ///
    /// # Arguments
    ///
    /// * `field` - Untrimmed form text, e.g. `" 300 "`
    pub async fn set_max_rate_from_form(&self, field: &str) -> Result<RateLimit> {
        let rate = RateLimit::parse(field)?;
        self.apply_rate(rate).await?;
        Ok(rate)
    }

    async fn apply_rate(&self, rate: RateLimit) -> Result<()> {
        self.remote
            .call(methods::MAXRATE, vec![json!(rate.kbps())])
            .await?;

        info!(max_rate = %rate, "Updated maximum download rate");
        self.clear_status_cache().await;
        Ok(())
    }

    /// Enqueue the NZB identified by the last path segment of `source_url`
    ///
    /// # Arguments
    ///
    /// * `source_url` - Page URL submitted by the bookmarklet
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use hella_core::QueueControlClient;
    /// # async fn example(client: &QueueControlClient) -> hella_core::Result<()> {
    /// let id = client
    ///     .enqueue_from_url("https://v3.newzbin.com/browse/post/3456789/")
    ///     .await?;
    /// assert_eq!(id.as_str(), "3456789");
    /// # Ok(())
    /// # }
    /// ```
    pub async fn enqueue_from_url(&self, source_url: &str) -> Result<ItemId> {
        let id = BookmarkletRequest::new(source_url).item_id()?;

        self.remote
            .call(methods::ENQUEUE_NEWZBIN, vec![json!(id.as_str())])
            .await
            .map_err(|e| match e {
                CallError::Fault {
                    code: fault::ALREADY_QUEUED,
                    ..
                } => QueueError::AlreadyQueued(id.to_string()),
                CallError::Fault {
                    code: fault::INVALID_ARGUMENT,
                    message,
                } => QueueError::InvalidId(format!("{}: {}", id, message)),
                other => QueueError::from(other),
            })?;

        info!(item_id = %id, source_url = %source_url, "Enqueued item from URL");
        self.clear_status_cache().await;
        Ok(id)
    }

    /// Status snapshot, served from cache when one is held
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use hella_core::QueueControlClient;
    /// # async fn example(client: &QueueControlClient) -> hella_core::Result<()> {
    /// let status = client.status().await?;
    /// if status.is_unlimited() {
    ///     println!("{} queued, no rate cap", status.queue_length);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn status(&self) -> Result<StatusSnapshot> {
        let mut cache = self.status_cache.lock().await;
        if let Some(snapshot) = cache.as_ref() {
            debug!("Serving cached status snapshot");
            return Ok(snapshot.clone());
        }

        let snapshot: StatusSnapshot = self.invoke(methods::STATUS, vec![]).await?;
        *cache = Some(snapshot.clone());
        Ok(snapshot)
    }

    /// Fetch a fresh status snapshot, replacing any cached one
    pub async fn refresh_status(&self) -> Result<StatusSnapshot> {
        self.clear_status_cache().await;
        self.status().await
    }

    /// Drop the cached status snapshot so the next `status()` hits the server
    pub async fn clear_status_cache(&self) {
        *self.status_cache.lock().await = None;
    }

    /// The daemon's banner
    pub async fn ascii_art(&self) -> Result<String> {
        self.invoke(methods::ASCIIART, vec![]).await
    }

    async fn invoke<T: DeserializeOwned>(&self, method: &str, params: Vec<Value>) -> Result<T> {
        debug!(method = %method, "Calling remote queue server");

        let value = self.remote.call(method, params).await.map_err(|e| {
            warn!(method = %method, error = %e, "Remote call failed");
            QueueError::from(e)
        })?;

        serde_json::from_value(value).map_err(|e| {
            QueueError::Protocol(format!("unexpected '{}' response: {}", method, e))
        })
    }
}
