#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! HTTP transport used by the payment service clients.
//!
//! A thin hyper client behind a tower stack:
//! - TLS via rustls (HTTPS only unless insecure HTTP is explicitly allowed)
//! - Connection pooling
//! - Per-request timeout
//! - User-Agent header injection
//! - Transparent response decompression (gzip, brotli, deflate)
//! - Response body size limit
//!
//! The client never retries and never follows redirects. A request is sent
//! exactly once and its outcome is reported to the caller as-is; every HTTP
//! status is a completed exchange.
//!
//! # Example
//!
//! ```ignore
//! use paysvc_http::{HttpClientBuilder, HttpClientConfig};
//!
//! let client = HttpClientBuilder::with_config(HttpClientConfig::default()).build()?;
//!
//! let resp = client
//!     .request(Method::POST, "https://wallet.internal/v2/create_wallet_balance")
//!     .headers([("Content-Type", "application/json"), ("v-app", app_key)])
//!     .body_bytes(body)
//!     .send()
//!     .await?;
//! let status = resp.status();
//! let body = resp.bytes().await?;
//! ```

mod builder;
mod client;
mod config;
mod error;
mod layers;
mod request;
mod response;
mod tls;

pub use builder::HttpClientBuilder;
pub use client::HttpClient;
pub use config::{DEFAULT_USER_AGENT, HttpClientConfig, TlsRootConfig, TransportSecurity};
pub use error::{HttpError, InvalidUriKind};
pub use layers::{UserAgentLayer, UserAgentService};
pub use request::RequestBuilder;
pub use response::{HttpResponse, ResponseBody};
