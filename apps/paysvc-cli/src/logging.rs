use anyhow::{Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::{LogFormat, LoggingConfig};

/// Filter for this run: `RUST_LOG` when set, otherwise the configured level.
fn build_filter(config: &LoggingConfig, rust_log: Option<&str>) -> Result<EnvFilter> {
    let directive = rust_log
        .filter(|value| !value.trim().is_empty())
        .unwrap_or(config.level.as_str());
    EnvFilter::try_new(directive).with_context(|| format!("invalid log filter '{directive}'"))
}

/// Install the global subscriber. Output goes to stderr so stdout stays
/// reserved for command results.
///
/// # Errors
/// Returns an error for an invalid filter directive or if a global
/// subscriber is already installed.
pub fn init(config: &LoggingConfig, verbose: u8) -> Result<()> {
    let rust_log = if verbose > 0 {
        None
    } else {
        std::env::var(EnvFilter::DEFAULT_ENV).ok()
    };
    let filter = build_filter(config, rust_log.as_deref())?;
    let registry = tracing_subscriber::registry().with(filter);

    match config.format {
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .try_init(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_current_span(false),
            )
            .try_init(),
    }
    .context("failed to install log subscriber")
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn config(level: &str) -> LoggingConfig {
        LoggingConfig {
            level: level.to_owned(),
            format: LogFormat::Text,
        }
    }

    #[test]
    fn configured_level_is_used_without_rust_log() {
        let filter = build_filter(&config("paysvc_clients=debug,warn"), None).unwrap();
        assert!(filter.to_string().contains("paysvc_clients=debug"));
    }

    #[test]
    fn rust_log_wins_over_config() {
        let filter = build_filter(&config("info"), Some("trace")).unwrap();
        assert_eq!(filter.to_string(), "trace");

        let blank = build_filter(&config("info"), Some("  ")).unwrap();
        assert_eq!(blank.to_string(), "info");
    }

    #[test]
    fn bad_directive_is_reported() {
        let err = build_filter(&config("paysvc_clients=loud"), None).unwrap_err();
        assert!(err.to_string().contains("invalid log filter"));
    }
}
