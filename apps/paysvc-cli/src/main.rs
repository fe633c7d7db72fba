mod config;
mod logging;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use paysvc_clients::{CallOptions, ServiceClients, operations};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::config::AppConfig;

/// Operator tool for the payment service's outbound clients
#[derive(Parser)]
#[command(name = "paysvc-cli")]
#[command(about = "Inspect configuration and run outbound service calls")]
#[command(version)]
struct Cli {
    /// Path to configuration file (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print effective configuration (secrets redacted) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate configuration and exit
    Check,
    /// List every operation with its target, method and path
    Operations,
    /// Run one operation with a JSON payload and print the result
    Call {
        /// Operation name, e.g. `get_wallet_balance`
        operation: String,

        /// Request payload as JSON (omit for no-body operations)
        #[arg(short, long)]
        payload: Option<String>,

        /// Deadline for the whole call, in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Check);

    // Static table; needs no configuration.
    if matches!(command, Commands::Operations) {
        print_operations();
        return Ok(());
    }

    if let Some(path) = &cli.config
        && !path.is_file()
    {
        anyhow::bail!("config file does not exist: {}", path.display());
    }

    // Layered config:
    // 1) defaults -> 2) YAML (if provided) -> 3) env (PAYSVC__*) -> 4) CLI overrides
    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_cli_overrides(cli.verbose);

    logging::init(&config.logging, cli.verbose)?;

    if cli.print_config {
        println!("{}", config.to_pretty_json()?);
        return Ok(());
    }

    match command {
        Commands::Check => check_config(&config),
        Commands::Call {
            operation,
            payload,
            timeout_ms,
        } => call(config, &operation, payload.as_deref(), timeout_ms).await,
        Commands::Operations => Ok(()),
    }
}

fn check_config(config: &AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");
    config
        .clients
        .validate()
        .context("configuration is invalid")?;
    println!("Configuration is valid");
    println!("{}", config.to_pretty_json()?);
    Ok(())
}

fn print_operations() {
    for op in operations() {
        println!(
            "{:<28} {:<14} {:<6} {}",
            op.name,
            op.target.as_str(),
            op.method.as_str(),
            op.path
        );
    }
}

async fn call(
    config: AppConfig,
    operation: &str,
    payload: Option<&str>,
    timeout_ms: Option<u64>,
) -> Result<()> {
    let payload: Value = match payload {
        Some(raw) => serde_json::from_str(raw).context("payload is not valid JSON")?,
        None => Value::Null,
    };

    let clients = ServiceClients::new(Arc::new(config.clients))?;

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted; cancelling in-flight call");
            on_signal.cancel();
        }
    });

    let mut options = CallOptions::new().with_cancellation(cancel);
    if let Some(ms) = timeout_ms {
        options = options.with_deadline(Duration::from_millis(ms));
    }

    let value = clients
        .call_json_with(operation, payload, &options)
        .await
        .with_context(|| format!("call to '{operation}' failed"))?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
