use paysvc_http::HttpError;
use thiserror::Error;

/// Failure of one operation call.
///
/// Exactly three kinds. Each carries the operation name and the source error
/// untouched; nothing here is retried or recovered.
#[derive(Debug, Error)]
pub enum CallError {
    /// The payload does not match the operation's request shape, or the
    /// operation name is unknown. Raised before any I/O.
    #[error("invalid request for '{operation}': {source}")]
    RequestFormat {
        operation: String,
        #[source]
        source: serde_json::Error,
    },

    /// The exchange did not complete.
    #[error("transport failure in '{operation}': {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: HttpError,
    },

    /// The response body could not be decoded into the operation's envelope.
    #[error("cannot decode '{operation}' response (HTTP {status}): {source}")]
    Decode {
        operation: &'static str,
        status: u16,
        #[source]
        source: serde_json::Error,
    },
}

impl CallError {
    #[must_use]
    pub fn operation(&self) -> &str {
        match self {
            Self::RequestFormat { operation, .. } => operation,
            Self::Transport { operation, .. } | Self::Decode { operation, .. } => operation,
        }
    }

    /// Stable label for log fields and metrics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RequestFormat { .. } => "request_format",
            Self::Transport { .. } => "transport",
            Self::Decode { .. } => "decode",
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration value for '{key}': {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error("failed to build HTTP client: {0}")]
    Http(#[from] HttpError),
}

impl ConfigError {
    pub(crate) fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}
