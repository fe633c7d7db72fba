#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Typed clients for the services the payment service calls.
//!
//! Every remote call is an [`Operation`]: a static contract naming its
//! target, method, path and request/response shapes. [`ServiceClients`]
//! runs any operation through one shared pipeline:
//!
//! 1. encode the request (or reject it with [`CallError::RequestFormat`]
//!    before any I/O),
//! 2. attach the target's credential headers,
//! 3. send once through the [`Transport`] (no retries),
//! 4. decode the `{status, code, message, data}` envelope,
//! 5. return the field the operation cares about.
//!
//! Operations can be called three ways:
//!
//! ```ignore
//! let user = clients.get_user(&UserQuery { user_id: 7 }).await?;
//! let user = clients.call::<GetUser>(&UserQuery { user_id: 7 }).await?;
//! let user = clients.call_json("get_user", json!({"user_id": 7})).await?;
//! ```

mod client;
mod config;
mod dispatcher;
mod error;
mod headers;
mod operation;
pub mod operations;
mod payload;
mod secret;
mod transport;

pub use client::ServiceClients;
pub use config::{ClientsConfig, RaveConfig, ServiceUrls, TlsRoots, TransportSettings};
pub use dispatcher::Dispatcher;
pub use error::{CallError, ConfigError};
pub use headers::{CredentialPolicy, HeaderMapping};
pub use operation::{CallOptions, Envelope, Operation, Target};
pub use payload::{OperationInfo, OperationPayload, find_operation, operations};
pub use secret::SecretString;
pub use transport::{HttpTransport, OutboundRequest, RawResponse, Transport};

pub use paysvc_http::HttpError;
