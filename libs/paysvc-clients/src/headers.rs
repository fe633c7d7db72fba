use std::fmt;

use crate::config::ClientsConfig;
use crate::operation::Target;

pub const CONTENT_TYPE: &str = "Content-Type";
pub const APPLICATION_JSON: &str = "application/json";
pub const V_APP: &str = "v-app";
pub const AUTHORIZATION: &str = "Authorization";

const SENSITIVE: [&str; 2] = [V_APP, AUTHORIZATION];

/// How a target authenticates the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialPolicy {
    /// `v-app: {application_key}`
    ApplicationKey,
    /// `Authorization: Bearer {secret_key}`
    Bearer,
}

impl CredentialPolicy {
    #[must_use]
    pub const fn for_target(target: Target) -> Self {
        match target {
            Target::Rave => Self::Bearer,
            Target::Auth | Target::Credential | Target::Wallet | Target::Authorization => {
                Self::ApplicationKey
            }
        }
    }
}

/// Ordered header list sent with one request.
///
/// `Debug` masks credential values.
#[derive(Clone, PartialEq, Eq)]
pub struct HeaderMapping(Vec<(String, String)>);

impl HeaderMapping {
    /// Content type first, then the target's credential.
    #[must_use]
    pub fn for_target(target: Target, config: &ClientsConfig) -> Self {
        let credential = match CredentialPolicy::for_target(target) {
            CredentialPolicy::ApplicationKey => (
                V_APP.to_owned(),
                config.application_key.expose().to_owned(),
            ),
            CredentialPolicy::Bearer => (
                AUTHORIZATION.to_owned(),
                format!("Bearer {}", config.rave.secret_key.expose()),
            ),
        };
        Self(vec![
            (CONTENT_TYPE.to_owned(), APPLICATION_JSON.to_owned()),
            credential,
        ])
    }

    /// Case-insensitive lookup.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for HeaderMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.0.iter().map(|(k, v)| {
                let shown = if SENSITIVE.iter().any(|s| k.eq_ignore_ascii_case(s)) {
                    "[REDACTED]"
                } else {
                    v.as_str()
                };
                (k.as_str(), shown)
            }))
            .finish()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::config::tests::sample;

    #[test]
    fn inter_service_mapping_is_exact() {
        let config = sample();
        for target in [
            Target::Auth,
            Target::Credential,
            Target::Wallet,
            Target::Authorization,
        ] {
            let headers = HeaderMapping::for_target(target, &config);
            let pairs: Vec<_> = headers.iter().collect();
            assert_eq!(
                pairs,
                [
                    ("Content-Type", "application/json"),
                    ("v-app", "app-key-123")
                ]
            );
        }
    }

    #[test]
    fn gateway_mapping_is_exact() {
        let headers = HeaderMapping::for_target(Target::Rave, &sample());
        let pairs: Vec<_> = headers.iter().collect();
        assert_eq!(
            pairs,
            [
                ("Content-Type", "application/json"),
                ("Authorization", "Bearer FLWSECK_TEST-xyz")
            ]
        );
        assert_eq!(headers.get("authorization"), Some("Bearer FLWSECK_TEST-xyz"));
        assert_eq!(headers.get("v-app"), None);
    }

    #[test]
    fn debug_masks_credentials() {
        let config = sample();
        let app = format!("{:?}", HeaderMapping::for_target(Target::Wallet, &config));
        let rave = format!("{:?}", HeaderMapping::for_target(Target::Rave, &config));
        assert!(app.contains("application/json"));
        assert!(!app.contains("app-key-123"));
        assert!(!rave.contains("FLWSECK_TEST-xyz"));
    }
}
