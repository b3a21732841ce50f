// Request Pipeline - ordered pre-conditions run before every controller action
//
// authorize -> set defaults -> load queue -> load status

use crate::application::QueueControlClient;
use crate::domain::{QueueItem, StatusSnapshot};
use crate::error::{QueueError, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Default page refresh interval for views
pub const DEFAULT_REFRESH_SECS: u32 = 10;
const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Controller actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Index,
    Queue,
    Dequeue,
    Bandwidth,
    EnqueueBookmarklet,
    Bookmarklet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// Where the request arrived, used to build the bookmarklet link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    /// Scheme including separator, e.g. `"http://"`
    pub protocol: String,
    pub host: String,
    pub port: u16,
}

impl Origin {
    pub fn base_url(&self) -> String {
        format!("{}{}:{}", self.protocol, self.host, self.port)
    }
}

/// Framework-neutral view of an inbound request
#[derive(Debug, Clone)]
pub struct Request {
    pub method: HttpMethod,
    pub params: HashMap<String, String>,
    pub credentials: Option<String>,
    pub origin: Option<Origin>,
}

impl Request {
    pub fn get() -> Self {
        Self::with_method(HttpMethod::Get)
    }

    pub fn post() -> Self {
        Self::with_method(HttpMethod::Post)
    }

    fn with_method(method: HttpMethod) -> Self {
        Self {
            method,
            params: HashMap::new(),
            credentials: None,
            origin: None,
        }
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn credentials(mut self, secret: impl Into<String>) -> Self {
        self.credentials = Some(secret.into());
        self
    }

    pub fn origin(mut self, origin: Origin) -> Self {
        self.origin = Some(origin);
        self
    }

    pub fn get_param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn require_param(&self, name: &str) -> Result<&str> {
        self.get_param(name)
            .ok_or_else(|| QueueError::InvalidArgument(format!("missing '{}' parameter", name)))
    }

    pub fn is_post(&self) -> bool {
        self.method == HttpMethod::Post
    }
}

/// Decides whether a request may proceed
pub trait Authorizer: Send + Sync {
    fn authorize(&self, request: &Request) -> Result<()>;
}

/// Lets every request through
pub struct AllowAll;

impl Authorizer for AllowAll {
    fn authorize(&self, _request: &Request) -> Result<()> {
        Ok(())
    }
}

/// Requires the request credentials to equal a configured secret
pub struct SharedSecret {
    secret: String,
}

impl SharedSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

impl Authorizer for SharedSecret {
    fn authorize(&self, request: &Request) -> Result<()> {
        match request.credentials.as_deref() {
            Some(given) if given == self.secret => Ok(()),
            Some(_) => Err(QueueError::Unauthorized("bad credentials".to_string())),
            None => Err(QueueError::Unauthorized("credentials required".to_string())),
        }
    }
}

/// Values the defaults stage falls back to
#[derive(Debug, Clone)]
pub struct ViewDefaults {
    pub refresh_interval_secs: u32,
    pub base_url: String,
}

impl Default for ViewDefaults {
    fn default() -> Self {
        Self {
            refresh_interval_secs: DEFAULT_REFRESH_SECS,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// View settings resolved for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSettings {
    pub refresh_interval_secs: u32,
    pub base_url: String,
}

/// Pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Authorize,
    SetDefaults,
    LoadQueue,
    LoadStatus,
}

impl Stage {
    pub const ORDER: [Stage; 4] = [
        Stage::Authorize,
        Stage::SetDefaults,
        Stage::LoadQueue,
        Stage::LoadStatus,
    ];

    /// Whether this stage runs before `action`
    pub fn applies_to(self, action: Action) -> bool {
        match self {
            Stage::Authorize | Stage::SetDefaults => true,
            Stage::LoadQueue => action != Action::Index,
            Stage::LoadStatus => action != Action::Queue,
        }
    }
}

/// State accumulated by the pipeline and handed to the action
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub action: Action,
    pub view: ViewSettings,
    pub queue: Option<Vec<QueueItem>>,
    pub status: Option<StatusSnapshot>,
}

impl RequestContext {
    fn new(action: Action, defaults: &ViewDefaults) -> Self {
        Self {
            action,
            view: ViewSettings {
                refresh_interval_secs: defaults.refresh_interval_secs,
                base_url: defaults.base_url.clone(),
            },
            queue: None,
            status: None,
        }
    }
}

pub struct Pipeline {
    authorizer: Arc<dyn Authorizer>,
    defaults: ViewDefaults,
}

impl Pipeline {
    pub fn new(authorizer: Arc<dyn Authorizer>, defaults: ViewDefaults) -> Self {
        Self {
            authorizer,
            defaults,
        }
    }

    /// Run every applicable stage for `action`, stopping at the first failure
    pub async fn run(
        &self,
        action: Action,
        request: &Request,
        client: &QueueControlClient,
    ) -> Result<RequestContext> {
        let mut ctx = RequestContext::new(action, &self.defaults);

        for stage in Stage::ORDER {
            if !stage.applies_to(action) {
                continue;
            }
            debug!(?action, ?stage, "Running pipeline stage");

            match stage {
                Stage::Authorize => self.authorizer.authorize(request)?,
                Stage::SetDefaults => self.set_defaults(request, &mut ctx),
                Stage::LoadQueue => ctx.queue = Some(client.list_queue().await?),
                Stage::LoadStatus => ctx.status = Some(client.status().await?),
            }
        }

        Ok(ctx)
    }

    fn set_defaults(&self, request: &Request, ctx: &mut RequestContext) {
        if let Some(secs) = request
            .get_param("refresh")
            .and_then(|s| s.trim().parse::<u32>().ok())
            .filter(|secs| *secs > 0)
        {
            ctx.view.refresh_interval_secs = secs;
        }
        if let Some(origin) = &request.origin {
            ctx.view.base_url = origin.base_url();
        }
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(Arc::new(AllowAll), ViewDefaults::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::{methods, MockRemoteCall};
    use serde_json::json;

    fn recording_client(allowed: &'static [&'static str]) -> QueueControlClient {
        let mut mock = MockRemoteCall::new();
        mock.expect_call().returning(move |method, _| {
            assert!(
                allowed.iter().any(|m| *m == method),
                "unexpected call to {}",
                method
            );
            match method {
                methods::LIST => Ok(json!([])),
                _ => Ok(json!({
                    "max_rate_kbps": 0,
                    "current_rate_kbps": 0.0,
                    "queue_length": 0
                })),
            }
        });
        QueueControlClient::new(Arc::new(mock))
    }

    #[test]
    fn test_stage_applicability() {
        assert!(!Stage::LoadQueue.applies_to(Action::Index));
        assert!(Stage::LoadStatus.applies_to(Action::Index));
        assert!(Stage::LoadQueue.applies_to(Action::Queue));
        assert!(!Stage::LoadStatus.applies_to(Action::Queue));
        assert!(Stage::Authorize.applies_to(Action::Bookmarklet));
    }

    #[tokio::test]
    async fn test_index_loads_status_only() {
        let client = recording_client(&[methods::STATUS]);
        let ctx = Pipeline::default()
            .run(Action::Index, &Request::get(), &client)
            .await
            .unwrap();

        assert!(ctx.queue.is_none());
        assert!(ctx.status.is_some());
    }

    #[tokio::test]
    async fn test_queue_loads_queue_only() {
        let client = recording_client(&[methods::LIST]);
        let ctx = Pipeline::default()
            .run(Action::Queue, &Request::get(), &client)
            .await
            .unwrap();

        assert_eq!(ctx.queue, Some(vec![]));
        assert!(ctx.status.is_none());
    }

    #[tokio::test]
    async fn test_rejected_request_stops_before_loading() {
        let client = recording_client(&[]);
        let pipeline = Pipeline::new(Arc::new(SharedSecret::new("s3cret")), ViewDefaults::default());

        let err = pipeline
            .run(Action::Dequeue, &Request::post().credentials("nope"), &client)
            .await
            .unwrap_err();
        assert!(matches!(err, QueueError::Unauthorized(_)));

        let err = pipeline
            .run(Action::Dequeue, &Request::post(), &client)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "unauthorized");
    }

    #[tokio::test]
    async fn test_defaults_from_request() {
        let client = recording_client(&[methods::LIST, methods::STATUS]);
        let request = Request::get().param("refresh", "30").origin(Origin {
            protocol: "https://".into(),
            host: "box".into(),
            port: 8443,
        });

        let ctx = Pipeline::default()
            .run(Action::Bookmarklet, &request, &client)
            .await
            .unwrap();

        assert_eq!(ctx.view.refresh_interval_secs, 30);
        assert_eq!(ctx.view.base_url, "https://box:8443");
    }

    #[tokio::test]
    async fn test_bad_refresh_falls_back_to_default() {
        let client = recording_client(&[methods::STATUS]);
        let request = Request::get().param("refresh", "0");

        let ctx = Pipeline::default()
            .run(Action::Index, &request, &client)
            .await
            .unwrap();
        assert_eq!(ctx.view.refresh_interval_secs, DEFAULT_REFRESH_SECS);
        assert_eq!(ctx.view.base_url, DEFAULT_BASE_URL);
    }
}
