use std::sync::Arc;

use bytes::Bytes;
use http::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};
use url::Url;

use crate::config::ClientsConfig;
use crate::dispatcher::{Dispatcher, redact_payload};
use crate::error::{CallError, ConfigError};
use crate::headers::HeaderMapping;
use crate::operation::{CallOptions, Operation};
use crate::payload::OperationPayload;
use crate::transport::{HttpTransport, OutboundRequest, Transport};

/// Entry point for every outbound operation.
///
/// Cheap to clone; clones share the configuration snapshot and the
/// transport's connection pool.
#[derive(Clone)]
pub struct ServiceClients {
    config: Arc<ClientsConfig>,
    dispatcher: Dispatcher,
}

impl ServiceClients {
    /// Validate `config` and build the HTTP transport from its `http` section.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if validation or client construction fails.
    pub fn new(config: Arc<ClientsConfig>) -> Result<Self, ConfigError> {
        config.validate()?;
        let transport = HttpTransport::from_settings(&config.http)?;
        Ok(Self {
            dispatcher: Dispatcher::new(Arc::new(transport)),
            config,
        })
    }

    /// Same as [`new`](Self::new) with a caller-provided transport.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if validation fails.
    pub fn with_transport(
        config: Arc<ClientsConfig>,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            dispatcher: Dispatcher::new(transport),
            config,
        })
    }

    #[must_use]
    pub fn config(&self) -> &ClientsConfig {
        &self.config
    }

    /// Run operation `O` with the configured default deadline.
    ///
    /// # Errors
    /// See [`CallError`].
    pub async fn call<O: Operation>(&self, request: &O::Request) -> Result<O::Output, CallError> {
        self.call_with::<O>(request, &CallOptions::default()).await
    }

    /// Run operation `O` with explicit call options. A missing deadline falls
    /// back to the configured default.
    ///
    /// # Errors
    /// See [`CallError`].
    pub async fn call_with<O: Operation>(
        &self,
        request: &O::Request,
        options: &CallOptions,
    ) -> Result<O::Output, CallError> {
        self.exchange::<O>(request, options)
            .await
            .map(|(_, output)| output)
    }

    /// Run an operation by name with an opaque JSON payload.
    ///
    /// # Errors
    /// [`CallError::RequestFormat`] for an unknown name or a payload that
    /// does not match the operation's request shape, without any I/O.
    /// Otherwise as [`call`](Self::call).
    pub async fn call_json(&self, operation: &str, payload: Value) -> Result<Value, CallError> {
        self.call_json_with(operation, payload, &CallOptions::default())
            .await
    }

    /// [`call_json`](Self::call_json) with explicit call options.
    ///
    /// # Errors
    /// See [`call_json`](Self::call_json).
    pub async fn call_json_with(
        &self,
        operation: &str,
        payload: Value,
        options: &CallOptions,
    ) -> Result<Value, CallError> {
        let tagged = json!({ "operation": operation, "payload": payload });
        let typed = match OperationPayload::deserialize(&tagged) {
            Ok(typed) => typed,
            Err(source) => {
                let mut payload = tagged["payload"].clone();
                redact_payload(&mut payload);
                tracing::error!(
                    operation,
                    payload = %payload,
                    error = %source,
                    "Payload does not match operation"
                );
                return Err(CallError::RequestFormat {
                    operation: operation.to_owned(),
                    source,
                });
            }
        };
        typed.dispatch(self, options).await
    }

    /// Typed call whose output is rendered as JSON.
    pub(crate) async fn call_value<O: Operation>(
        &self,
        request: &O::Request,
        options: &CallOptions,
    ) -> Result<Value, CallError> {
        let (status, output) = self.exchange::<O>(request, options).await?;
        serde_json::to_value(output).map_err(|source| CallError::Decode {
            operation: O::NAME,
            status: status.as_u16(),
            source,
        })
    }

    async fn exchange<O: Operation>(
        &self,
        request: &O::Request,
        options: &CallOptions,
    ) -> Result<(StatusCode, O::Output), CallError> {
        let body = if O::SENDS_BODY {
            Some(encode_body::<O>(request)?)
        } else {
            None
        };

        let outbound = OutboundRequest {
            operation: O::NAME,
            target: O::TARGET,
            method: O::METHOD,
            url: build_url(
                self.config.base_url(O::TARGET),
                O::PATH,
                O::path_suffix(request).as_deref(),
            ),
            headers: HeaderMapping::for_target(O::TARGET, &self.config),
            body,
        };

        let options = CallOptions {
            deadline: options.deadline.or(self.config.default_deadline()),
            cancellation: options.cancellation.clone(),
        };

        let (status, envelope) = self
            .dispatcher
            .dispatch::<O::Data>(outbound, &options)
            .await?;
        Ok((status, O::extract(envelope.data)))
    }
}

fn encode_body<O: Operation>(request: &O::Request) -> Result<Bytes, CallError> {
    serde_json::to_vec(request).map(Bytes::from).map_err(|source| {
        tracing::error!(
            operation = O::NAME,
            payload = ?request,
            error = %source,
            "Request payload could not be encoded"
        );
        CallError::RequestFormat {
            operation: O::NAME.to_owned(),
            source,
        }
    })
}

/// `{base}{path}{suffix}` with the base's trailing slash dropped.
fn build_url(base: &Url, path: &str, suffix: Option<&str>) -> String {
    format!(
        "{}{}{}",
        base.as_str().trim_end_matches('/'),
        path,
        suffix.unwrap_or_default()
    )
}
