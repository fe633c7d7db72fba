//! Configuration snapshot for the service clients.
//!
//! Built once at startup (the binary layers YAML and environment through
//! `figment`), validated, then shared read-only behind an `Arc`.

use std::time::Duration;

use http::HeaderValue;
use paysvc_http::{HttpClientConfig, TlsRootConfig, TransportSecurity};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;
use crate::operation::Target;
use crate::secret::SecretString;

/// Everything the adapters need to reach their targets.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ClientsConfig {
    /// Sent as `v-app` on every inter-service call.
    pub application_key: SecretString,
    pub services: ServiceUrls,
    pub rave: RaveConfig,
    #[serde(default)]
    pub http: TransportSettings,
    /// Default per-call deadline; `None` leaves only the transport timeout.
    #[serde(default)]
    pub deadline_ms: Option<u64>,
}

/// Base URLs of the sibling services.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceUrls {
    pub auth: Url,
    pub credential: Url,
    pub wallet: Url,
    pub authorization: Url,
}

/// External payment gateway.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RaveConfig {
    pub base_url: Url,
    /// Sent as `Authorization: Bearer {secret_key}`.
    pub secret_key: SecretString,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TlsRoots {
    #[default]
    Webpki,
    Native,
}

/// Transport knobs, mapped onto [`HttpClientConfig`].
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransportSettings {
    pub request_timeout_ms: u64,
    pub max_body_size: usize,
    /// Sibling services are usually plain HTTP inside the cluster.
    pub allow_insecure_http: bool,
    pub tls_roots: TlsRoots,
    pub user_agent: Option<String>,
}

impl Default for TransportSettings {
    fn default() -> Self {
        let defaults = HttpClientConfig::default();
        Self {
            request_timeout_ms: 30_000,
            max_body_size: defaults.max_body_size,
            allow_insecure_http: false,
            tls_roots: TlsRoots::Webpki,
            user_agent: None,
        }
    }
}

impl TransportSettings {
    #[must_use]
    pub fn to_http_config(&self) -> HttpClientConfig {
        let mut config = HttpClientConfig {
            request_timeout: Duration::from_millis(self.request_timeout_ms),
            max_body_size: self.max_body_size,
            transport: if self.allow_insecure_http {
                TransportSecurity::AllowInsecureHttp
            } else {
                TransportSecurity::TlsOnly
            },
            tls_roots: match self.tls_roots {
                TlsRoots::Webpki => TlsRootConfig::WebPki,
                TlsRoots::Native => TlsRootConfig::Native,
            },
            ..HttpClientConfig::default()
        };
        if let Some(user_agent) = &self.user_agent {
            config.user_agent.clone_from(user_agent);
        }
        config
    }
}

impl ClientsConfig {
    /// Check what call-time header construction relies on.
    ///
    /// # Errors
    /// Returns [`ConfigError`] for empty credentials, credentials that are not
    /// legal header values, base URLs that are not http(s), plain `http://`
    /// without `allow_insecure_http`, or a zero timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_credential("application_key", self.application_key.expose())?;
        check_credential("rave.secret_key", self.rave.secret_key.expose())?;
        HeaderValue::from_str(&format!("Bearer {}", self.rave.secret_key.expose()))
            .map_err(|_| ConfigError::invalid("rave.secret_key", "not a legal header value"))?;

        for target in Target::ALL {
            let url = self.base_url(target);
            if !matches!(url.scheme(), "http" | "https") {
                return Err(ConfigError::invalid(
                    target.config_key(),
                    format!("unsupported scheme '{}'", url.scheme()),
                ));
            }
            if url.scheme() == "http" && !self.http.allow_insecure_http {
                return Err(ConfigError::invalid(
                    target.config_key(),
                    "plain http requires http.allow_insecure_http",
                ));
            }
            if url.query().is_some() || url.fragment().is_some() {
                return Err(ConfigError::invalid(
                    target.config_key(),
                    "base URL must not carry a query or fragment",
                ));
            }
        }

        if self.http.request_timeout_ms == 0 {
            return Err(ConfigError::invalid(
                "http.request_timeout_ms",
                "must be greater than zero",
            ));
        }
        if self.deadline_ms == Some(0) {
            return Err(ConfigError::invalid("deadline_ms", "must be greater than zero"));
        }
        Ok(())
    }

    #[must_use]
    pub fn base_url(&self, target: Target) -> &Url {
        match target {
            Target::Auth => &self.services.auth,
            Target::Credential => &self.services.credential,
            Target::Wallet => &self.services.wallet,
            Target::Authorization => &self.services.authorization,
            Target::Rave => &self.rave.base_url,
        }
    }

    #[must_use]
    pub fn default_deadline(&self) -> Option<Duration> {
        self.deadline_ms.map(Duration::from_millis)
    }
}

fn check_credential(key: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::invalid(key, "must not be empty"));
    }
    HeaderValue::from_str(value)
        .map(|_| ())
        .map_err(|_| ConfigError::invalid(key, "not a legal header value"))
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
pub(crate) mod tests {
    use super::*;
    use figment::Figment;
    use figment::providers::{Format, Yaml};

    pub(crate) const SAMPLE: &str = r"
application_key: app-key-123
services:
  auth: http://auth.internal/v2/auth
  credential: http://auth.internal/v2/credential
  wallet: http://wallet.internal/v2
  authorization: http://authorization.internal/v2
rave:
  base_url: https://api.ravepay.co/v3
  secret_key: FLWSECK_TEST-xyz
http:
  allow_insecure_http: true
";

    pub(crate) fn sample() -> ClientsConfig {
        Figment::new()
            .merge(Yaml::string(SAMPLE))
            .extract()
            .unwrap()
    }

    #[test]
    fn yaml_sample_is_valid() {
        let config = sample();
        config.validate().unwrap();
        assert_eq!(config.application_key.expose(), "app-key-123");
        assert_eq!(config.http.request_timeout_ms, 30_000);
        assert!(config.http.allow_insecure_http);
        assert_eq!(config.default_deadline(), None);
        assert_eq!(
            config.base_url(Target::Wallet).as_str(),
            "http://wallet.internal/v2"
        );
    }

    #[test]
    fn transport_settings_map_onto_http_config() {
        let mut settings = TransportSettings {
            request_timeout_ms: 1500,
            user_agent: Some("payment-service/3".to_owned()),
            ..TransportSettings::default()
        };
        let http = settings.to_http_config();
        assert_eq!(http.request_timeout, Duration::from_millis(1500));
        assert_eq!(http.transport, TransportSecurity::TlsOnly);
        assert_eq!(http.user_agent, "payment-service/3");

        settings.allow_insecure_http = true;
        assert_eq!(
            settings.to_http_config().transport,
            TransportSecurity::AllowInsecureHttp
        );
    }

    #[test]
    fn empty_application_key_is_rejected() {
        let mut config = sample();
        config.application_key = SecretString::new("");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("application_key"));
    }

    #[test]
    fn secret_with_newline_is_rejected() {
        let mut config = sample();
        config.rave.secret_key = SecretString::new("abc\ndef");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("rave.secret_key"));
    }

    #[test]
    fn non_http_base_url_is_rejected() {
        let mut config = sample();
        config.services.wallet = Url::parse("ftp://wallet.internal").unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("services.wallet"));
    }

    #[test]
    fn plain_http_needs_insecure_opt_in() {
        let mut config = sample();
        config.http.allow_insecure_http = false;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("services.auth"), "{err}");
        assert!(err.to_string().contains("allow_insecure_http"), "{err}");

        config.services.auth = Url::parse("https://auth.internal/v2/auth").unwrap();
        config.services.credential = Url::parse("https://auth.internal/v2/credential").unwrap();
        config.services.wallet = Url::parse("https://wallet.internal/v2").unwrap();
        config.services.authorization = Url::parse("https://authorization.internal/v2").unwrap();
        config.validate().unwrap();
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let yaml = format!("{SAMPLE}\nsurprise: true\n");
        let result: Result<ClientsConfig, _> =
            Figment::new().merge(Yaml::string(&yaml)).extract();
        assert!(result.is_err());
    }

    #[test]
    fn debug_output_redacts_credentials() {
        let rendered = format!("{:?}", sample());
        assert!(!rendered.contains("app-key-123"));
        assert!(!rendered.contains("FLWSECK_TEST-xyz"));
    }
}
