use std::fmt;
use std::time::Duration;

use http::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use tokio_util::sync::CancellationToken;

/// One integration with its own base URL and credential policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    Auth,
    Credential,
    Wallet,
    Authorization,
    Rave,
}

impl Target {
    pub const ALL: [Target; 5] = [
        Target::Auth,
        Target::Credential,
        Target::Wallet,
        Target::Authorization,
        Target::Rave,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Target::Auth => "auth",
            Target::Credential => "credential",
            Target::Wallet => "wallet",
            Target::Authorization => "authorization",
            Target::Rave => "rave",
        }
    }

    /// Configuration key holding this target's base URL.
    #[must_use]
    pub const fn config_key(self) -> &'static str {
        match self {
            Target::Auth => "services.auth",
            Target::Credential => "services.credential",
            Target::Wallet => "services.wallet",
            Target::Authorization => "services.authorization",
            Target::Rave => "rave.base_url",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static contract of one remote operation.
///
/// The request type is what callers hand in, `Data` is the envelope's `data`
/// field as the remote service sends it, and `Output` is what the adapter
/// returns after [`extract`](Self::extract).
pub trait Operation: Send + Sync + 'static {
    type Request: Serialize + DeserializeOwned + fmt::Debug + Send + Sync;
    type Data: DeserializeOwned + Default + fmt::Debug + Send;
    type Output: Serialize + Send;

    const NAME: &'static str;
    const TARGET: Target;
    const METHOD: Method;
    const PATH: &'static str;
    /// `false` for lookups whose request only feeds the URL.
    const SENDS_BODY: bool = true;

    /// Appended verbatim after [`PATH`](Self::PATH).
    fn path_suffix(_request: &Self::Request) -> Option<String> {
        None
    }

    fn extract(data: Self::Data) -> Self::Output;
}

/// Response envelope shared by every remote service.
///
/// All fields are optional on the wire; `data: null` and a missing `data`
/// both decode to `T::default()`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(bound(deserialize = "T: Deserialize<'de> + Default"))]
pub struct Envelope<T> {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub code: Option<serde_json::Value>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: T,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Per-call bounds on an exchange.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    /// Upper bound on the whole exchange, on top of the transport timeout.
    pub deadline: Option<Duration>,
    pub cancellation: Option<CancellationToken>,
}

impl CallOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }
}
