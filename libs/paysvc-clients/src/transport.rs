use async_trait::async_trait;
use bytes::Bytes;
use http::{Method, StatusCode};
use paysvc_http::{HttpClient, HttpClientBuilder, HttpError};

use crate::config::TransportSettings;
use crate::headers::HeaderMapping;
use crate::operation::Target;

/// A fully resolved request, ready to go on the wire.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub operation: &'static str,
    pub target: Target,
    pub method: Method,
    pub url: String,
    pub headers: HeaderMapping,
    /// Encoded JSON; `None` for no-body calls.
    pub body: Option<Bytes>,
}

/// Status and raw body of a completed exchange.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

/// One request/response exchange.
///
/// Implementations send exactly once and report every HTTP status as `Ok`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: OutboundRequest) -> Result<RawResponse, HttpError>;
}

/// [`Transport`] over the shared [`HttpClient`].
#[derive(Clone)]
pub struct HttpTransport {
    client: HttpClient,
}

impl HttpTransport {
    #[must_use]
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// # Errors
    /// Returns `HttpError` if the TLS connector or user agent is invalid.
    pub fn from_settings(settings: &TransportSettings) -> Result<Self, HttpError> {
        HttpClientBuilder::with_config(settings.to_http_config())
            .build()
            .map(Self::new)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: OutboundRequest) -> Result<RawResponse, HttpError> {
        let mut builder = self
            .client
            .request(request.method, &request.url)
            .headers(request.headers.iter());
        if let Some(body) = request.body {
            builder = builder.body_bytes(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        Ok(RawResponse { status, body })
    }
}
