use std::borrow::Cow;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use http::StatusCode;
use paysvc_http::HttpError;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::CallError;
use crate::operation::{CallOptions, Envelope};
use crate::secret::REDACTED;
use crate::transport::{OutboundRequest, RawResponse, Transport};

/// Shared send/decode/log routine behind every operation.
///
/// Sends once, never retries and never interprets the HTTP status: the
/// envelope is decoded from whatever body came back. Logs one entry before
/// the exchange and one after.
#[derive(Clone)]
pub struct Dispatcher {
    transport: Arc<dyn Transport>,
}

impl Dispatcher {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// # Errors
    /// [`CallError::Transport`] when the exchange does not complete (including
    /// deadline and cancellation), [`CallError::Decode`] when the body is not
    /// a valid envelope for `T`.
    pub async fn dispatch<T>(
        &self,
        request: OutboundRequest,
        options: &CallOptions,
    ) -> Result<(StatusCode, Envelope<T>), CallError>
    where
        T: DeserializeOwned + Default + Debug,
    {
        let operation = request.operation;
        let target = request.target.as_str();
        let method = request.method.clone();
        let url = request.url.clone();

        tracing::debug!(
            operation,
            target,
            method = %method,
            url = %url,
            payload = %payload_for_log(request.body.as_ref()),
            "Dispatching request"
        );

        let started = Instant::now();
        let raw = match exchange(self.transport.as_ref(), request, options).await {
            Ok(raw) => raw,
            Err(source) => {
                tracing::warn!(
                    operation,
                    target,
                    method = %method,
                    url = %url,
                    elapsed_ms = elapsed_ms(started),
                    error = %source,
                    "Request failed"
                );
                return Err(CallError::Transport { operation, source });
            }
        };

        let status = raw.status;
        match serde_json::from_slice::<Envelope<T>>(&raw.body) {
            Ok(envelope) => {
                tracing::debug!(
                    operation,
                    target,
                    status = status.as_u16(),
                    elapsed_ms = elapsed_ms(started),
                    response = ?envelope,
                    "Request completed"
                );
                Ok((status, envelope))
            }
            Err(source) => {
                tracing::warn!(
                    operation,
                    target,
                    status = status.as_u16(),
                    elapsed_ms = elapsed_ms(started),
                    body_bytes = raw.body.len(),
                    error = %source,
                    "Response could not be decoded"
                );
                Err(CallError::Decode {
                    operation,
                    status: status.as_u16(),
                    source,
                })
            }
        }
    }
}

/// Apply the caller's deadline and cancellation token to one send.
async fn exchange(
    transport: &dyn Transport,
    request: OutboundRequest,
    options: &CallOptions,
) -> Result<RawResponse, HttpError> {
    let bounded = async {
        match options.deadline {
            Some(deadline) => tokio::time::timeout(deadline, transport.send(request))
                .await
                .unwrap_or(Err(HttpError::DeadlineExceeded(deadline))),
            None => transport.send(request).await,
        }
    };

    match &options.cancellation {
        Some(token) => tokio::select! {
            biased;
            () = token.cancelled() => Err(HttpError::Cancelled),
            result = bounded => result,
        },
        None => bounded.await,
    }
}

/// Request fields whose values never go to the log.
const SENSITIVE_FIELDS: [&str; 4] = ["token", "access_token", "secret_key", "password"];

/// Mask sensitive fields at any depth.
pub(crate) fn redact_payload(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, field) in map.iter_mut() {
                if SENSITIVE_FIELDS.iter().any(|s| key.eq_ignore_ascii_case(s)) {
                    *field = Value::String(REDACTED.to_owned());
                } else {
                    redact_payload(field);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(redact_payload),
        _ => {}
    }
}

fn payload_for_log(body: Option<&Bytes>) -> Cow<'_, str> {
    let Some(bytes) = body else {
        return Cow::Borrowed("<none>");
    };
    match serde_json::from_slice::<Value>(bytes) {
        Ok(mut value) => {
            redact_payload(&mut value);
            Cow::Owned(value.to_string())
        }
        Err(_) => String::from_utf8_lossy(bytes),
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
