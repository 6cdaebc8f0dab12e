//! Backend double for driving real gateways through the sync layer.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use taskhub_client::{ApiClient, ApiRequest, RawResponse, Transport, TransportError};
use taskhub_core::StatusDialect;

type Handler = dyn Fn(&ApiRequest) -> (u16, Value, Duration) + Send + Sync;

/// Transport that answers every request through a closure, after an
/// optional per-request delay, and records what it was sent.
pub struct Backend {
    handler: Box<Handler>,
    pub requests: Mutex<Vec<ApiRequest>>,
}

impl Backend {
    pub fn new(handler: impl Fn(&ApiRequest) -> (u16, Value, Duration) + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self {
            handler: Box::new(handler),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn api(self: &Arc<Self>, dialect: StatusDialect) -> ApiClient {
        ApiClient::new(self.clone(), dialect)
    }

    pub fn sent(&self, method: &str) -> Vec<ApiRequest> {
        self.requests
            .lock()
            .iter()
            .filter(|r| r.method.as_str() == method)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl Transport for Backend {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, TransportError> {
        let (status, body, delay) = (self.handler)(&request);
        self.requests.lock().push(request);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        Ok(RawResponse::new(status, body))
    }
}
