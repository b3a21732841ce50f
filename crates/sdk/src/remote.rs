//! JSON-RPC over HTTP implementation of the `RemoteCall` port

use crate::config::{RemoteConfig, RPC_USER};
use crate::error::{to_call_error, Result, SdkError};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use hella_core::port::{CallError, RemoteCall};
use jsonrpsee::core::client::ClientT;
use jsonrpsee::core::params::ArrayParams;
use jsonrpsee::http_client::{HeaderMap, HeaderValue, HttpClient, HttpClientBuilder};
use serde_json::Value;
use tracing::debug;

/// Sends each call as one JSON-RPC 2.0 request with positional params
pub struct JsonRpcRemote {
    client: HttpClient,
    url: String,
}

impl JsonRpcRemote {
    pub fn new(config: &RemoteConfig) -> Result<Self> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        if let Some(password) = &config.password {
            let token = STANDARD.encode(format!("{}:{}", RPC_USER, password));
            let value = HeaderValue::from_str(&format!("Basic {}", token))
                .map_err(|e| SdkError::InvalidConfig(format!("Bad password header: {}", e)))?;
            headers.insert("Authorization", value);
        }

        let client = HttpClientBuilder::default()
            .request_timeout(config.timeout)
            .set_headers(headers)
            .build(&config.url)
            .map_err(|e| SdkError::Connection(format!("Failed to create client: {}", e)))?;

        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RemoteCall for JsonRpcRemote {
    async fn call(&self, method: &str, params: Vec<Value>) -> std::result::Result<Value, CallError> {
        let mut array = ArrayParams::new();
        for param in params {
            array
                .insert(param)
                .map_err(|e| CallError::Decode(format!("Unencodable parameter: {}", e)))?;
        }

        debug!(url = %self.url, method = %method, "Sending JSON-RPC request");
        self.client
            .request::<Value, _>(method, array)
            .await
            .map_err(to_call_error)
    }
}
