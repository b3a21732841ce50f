//! In-memory stand-in for the hellanzb queue daemon
//!
//! Implements just enough of the remote method surface to exercise the client,
//! both in-process (as a `RemoteCall`) and over HTTP (as a jsonrpsee server).

#![allow(dead_code)]

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hella_core::domain::{ItemState, QueueItem, StatusSnapshot};
use hella_core::port::{fault, methods, CallError, RemoteCall};
use hella_sdk::RPC_USER;
use jsonrpsee::server::{HttpBody, HttpRequest, HttpResponse, Server, ServerHandle};
use jsonrpsee::types::ErrorObjectOwned;
use jsonrpsee::RpcModule;
use serde_json::{json, Value};
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

pub const ASCII_ART: &str = " _          _ _\n| |__   ___| | | __ _\n| '_ \\ / _ \\ | |/ _` |\n|_| |_|\\___|_|_|\\__,_|";

const SERVED_METHODS: [&str; 6] = [
    methods::LIST,
    methods::STATUS,
    methods::DEQUEUE,
    methods::MAXRATE,
    methods::ENQUEUE_NEWZBIN,
    methods::ASCIIART,
];

#[derive(Default)]
struct State {
    items: Vec<QueueItem>,
    max_rate_kbps: u32,
}

#[derive(Default)]
pub struct InMemoryQueue {
    state: Mutex<State>,
    fail_next: AtomicU32,
    calls: AtomicU32,
}

fn rejected(code: i32, message: impl Into<String>) -> CallError {
    CallError::Fault {
        code,
        message: message.into(),
    }
}

fn string_arg(params: &[Value]) -> Result<String, CallError> {
    params
        .first()
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| rejected(fault::INVALID_ARGUMENT, "expected a string argument"))
}

impl InMemoryQueue {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make the next `n` in-process calls fail as if the server were down
    pub fn fail_next(&self, n: u32) {
        self.fail_next.store(n, Ordering::SeqCst);
    }

    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn ids(&self) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state.items.iter().map(|i| i.id.to_string()).collect()
    }

    pub fn dispatch(&self, method: &str, params: Vec<Value>) -> Result<Value, CallError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().unwrap();

        match method {
            methods::LIST => Ok(serde_json::to_value(&state.items).unwrap()),
            methods::STATUS => {
                let snapshot = StatusSnapshot {
                    max_rate_kbps: state.max_rate_kbps,
                    current_rate_kbps: if state.items.is_empty() { 0.0 } else { 87.5 },
                    queue_length: state.items.len() as u32,
                };
                Ok(serde_json::to_value(snapshot).unwrap())
            }
            methods::DEQUEUE => {
                let id = string_arg(&params)?;
                let index = state
                    .items
                    .iter()
                    .position(|i| i.id.as_str() == id)
                    .ok_or_else(|| rejected(fault::NOT_FOUND, format!("no nzb with id {}", id)))?;
                state.items.remove(index);
                for (pos, item) in state.items.iter_mut().enumerate() {
                    item.position = pos as u32 + 1;
                }
                Ok(json!(true))
            }
            methods::MAXRATE => {
                let rate = params
                    .first()
                    .and_then(Value::as_i64)
                    .ok_or_else(|| rejected(fault::INVALID_ARGUMENT, "expected an integer rate"))?;
                if rate < 0 {
                    return Err(rejected(fault::INVALID_ARGUMENT, "rate must be >= 0"));
                }
                state.max_rate_kbps = rate as u32;
                Ok(Value::Null)
            }
            methods::ENQUEUE_NEWZBIN => {
                let id = string_arg(&params)?;
                if !id.chars().all(|c| c.is_ascii_digit()) {
                    return Err(rejected(fault::INVALID_ARGUMENT, "newzbin ids are numeric"));
                }
                if state.items.iter().any(|i| i.id.as_str() == id) {
                    return Err(rejected(fault::ALREADY_QUEUED, format!("{} already queued", id)));
                }
                let position = state.items.len() as u32 + 1;
                let item: QueueItem = serde_json::from_value(json!({
                    "id": id,
                    "name": format!("newzbin-{}", id),
                    "size_bytes": 0,
                    "state": ItemState::Queued,
                    "position": position,
                }))
                .unwrap();
                state.items.push(item);
                Ok(json!(true))
            }
            methods::ASCIIART => Ok(json!(ASCII_ART)),
            other => Err(rejected(-32601, format!("unknown method {}", other))),
        }
    }
}

#[async_trait]
impl RemoteCall for InMemoryQueue {
    async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value, CallError> {
        let pending = self.fail_next.load(Ordering::SeqCst);
        if pending > 0 {
            self.fail_next.store(pending - 1, Ordering::SeqCst);
            self.calls.fetch_add(1, Ordering::SeqCst);
            return Err(CallError::Unreachable("simulated outage".into()));
        }
        self.dispatch(method, params)
    }
}

/// Applies the first `dequeue` it forwards, then reports a timeout as if the
/// reply had been lost on the way back
pub struct DropsFirstDequeueReply {
    queue: Arc<InMemoryQueue>,
    dropped: AtomicBool,
}

impl DropsFirstDequeueReply {
    pub fn new(queue: Arc<InMemoryQueue>) -> Arc<Self> {
        Arc::new(Self {
            queue,
            dropped: AtomicBool::new(false),
        })
    }
}

#[async_trait]
impl RemoteCall for DropsFirstDequeueReply {
    async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value, CallError> {
        let reply = self.queue.dispatch(method, params);
        if method == methods::DEQUEUE && !self.dropped.swap(true, Ordering::SeqCst) {
            return Err(CallError::Timeout);
        }
        reply
    }
}

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Tower layer answering 401 unless the request carries the expected
/// `Authorization: Basic` header
#[derive(Clone)]
pub struct RequireBasicAuth {
    expected: Arc<str>,
}

impl RequireBasicAuth {
    pub fn new(password: &str) -> Self {
        let token = BASE64.encode(format!("{}:{}", RPC_USER, password));
        Self {
            expected: format!("Basic {}", token).into(),
        }
    }
}

impl<S> tower::Layer<S> for RequireBasicAuth {
    type Service = BasicAuth<S>;

    fn layer(&self, inner: S) -> Self::Service {
        BasicAuth {
            inner,
            expected: self.expected.clone(),
        }
    }
}

#[derive(Clone)]
pub struct BasicAuth<S> {
    inner: S,
    expected: Arc<str>,
}

impl<S, B> tower::Service<HttpRequest<B>> for BasicAuth<S>
where
    S: tower::Service<HttpRequest<B>, Response = HttpResponse>,
    S::Error: Into<BoxError> + 'static,
    S::Future: Send + 'static,
{
    type Response = HttpResponse;
    type Error = BoxError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send + 'static>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx).map_err(Into::into)
    }

    fn call(&mut self, request: HttpRequest<B>) -> Self::Future {
        let authorized = request
            .headers()
            .get("authorization")
            .and_then(|value| value.to_str().ok())
            == Some(&*self.expected);

        if authorized {
            let response = self.inner.call(request);
            Box::pin(async move { response.await.map_err(Into::<BoxError>::into) })
        } else {
            Box::pin(async {
                let denied = HttpResponse::builder()
                    .status(401)
                    .header("www-authenticate", "Basic realm=\"hellanzb\"")
                    .body(HttpBody::from("unauthorized"))?;
                Ok::<_, BoxError>(denied)
            })
        }
    }
}

fn rpc_module(queue: Arc<InMemoryQueue>) -> RpcModule<Arc<InMemoryQueue>> {
    let mut module = RpcModule::new(queue);
    for method in SERVED_METHODS {
        module
            .register_method(method, move |params, queue, _| {
                let args: Vec<Value> = params.parse::<Option<Vec<Value>>>()?.unwrap_or_default();
                queue.dispatch(method, args).map_err(|e| match e {
                    CallError::Fault { code, message } => {
                        ErrorObjectOwned::owned(code, message, None::<()>)
                    }
                    other => ErrorObjectOwned::owned(fault::INTERNAL, other.to_string(), None::<()>),
                })
            })
            .unwrap();
    }
    module
}

/// Serve `queue` over JSON-RPC on an ephemeral localhost port
pub async fn serve(queue: Arc<InMemoryQueue>) -> (SocketAddr, ServerHandle) {
    let server = Server::builder().build("127.0.0.1:0").await.unwrap();
    let addr = server.local_addr().unwrap();
    (addr, server.start(rpc_module(queue)))
}

/// Like [`serve`], but every HTTP request must authenticate as
/// `hellanzb:<password>`
pub async fn serve_with_password(
    queue: Arc<InMemoryQueue>,
    password: &str,
) -> (SocketAddr, ServerHandle) {
    let middleware = tower::ServiceBuilder::new().layer(RequireBasicAuth::new(password));
    let server = Server::builder()
        .set_http_middleware(middleware)
        .build("127.0.0.1:0")
        .await
        .unwrap();
    let addr = server.local_addr().unwrap();
    (addr, server.start(rpc_module(queue)))
}
