#![allow(clippy::unwrap_used, clippy::expect_used)]
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use http::StatusCode;
use paysvc_clients::{
    ClientsConfig, HttpError, OutboundRequest, RawResponse, ServiceClients, Transport,
};
use serde_json::json;

pub const APP_KEY: &str = "app-key-123";
pub const RAVE_SECRET: &str = "FLWSECK_TEST-xyz";

/// Configuration with every target pointing at `base`.
#[must_use]
pub fn config_for(base: &str) -> ClientsConfig {
    serde_json::from_value(json!({
        "application_key": APP_KEY,
        "services": {
            "auth": base,
            "credential": base,
            "wallet": base,
            "authorization": base,
        },
        "rave": { "base_url": base, "secret_key": RAVE_SECRET },
        "http": { "allow_insecure_http": true, "request_timeout_ms": 5000 },
    }))
    .unwrap()
}

#[must_use]
pub fn clients_with(transport: Arc<dyn Transport>) -> ServiceClients {
    ServiceClients::with_transport(Arc::new(config_for("http://upstream.test")), transport)
        .unwrap()
}

/// Records every request and answers with a fixed status and body.
pub struct RecordingTransport {
    status: StatusCode,
    body: &'static str,
    calls: AtomicUsize,
    seen: Mutex<Vec<OutboundRequest>>,
}

impl RecordingTransport {
    #[must_use]
    pub fn new(status: StatusCode, body: &'static str) -> Arc<Self> {
        Arc::new(Self {
            status,
            body,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        })
    }

    #[must_use]
    pub fn ok(body: &'static str) -> Arc<Self> {
        Self::new(StatusCode::OK, body)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last(&self) -> OutboundRequest {
        self.seen.lock().unwrap().last().cloned().expect("no request seen")
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, request: OutboundRequest) -> Result<RawResponse, HttpError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(request);
        Ok(RawResponse {
            status: self.status,
            body: Bytes::from_static(self.body.as_bytes()),
        })
    }
}

/// Fails every exchange with a connection-level error.
pub struct FailingTransport {
    pub calls: AtomicUsize,
}

impl FailingTransport {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl Transport for FailingTransport {
    async fn send(&self, _request: OutboundRequest) -> Result<RawResponse, HttpError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(HttpError::Transport("connection refused".into()))
    }
}
