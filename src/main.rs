//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `phishguard` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - Ctrl-C handling
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use std::net::SocketAddr;
use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;

use phishguard::config::{DEFAULT_BIND_ADDR, PROVIDER_HTTP_TIMEOUT_SECS, RATE_LIMIT_REQUESTS};
use phishguard::initialization::{init_crypto_provider, init_logger_with};
use phishguard::server::{start_server, AppState, RateLimiter};
use phishguard::{Config, LogFormat, LogLevel, ProviderCredentials, Verifier, VerifyError};

/// Exit code for a rejected URL
const EXIT_INVALID_URL: i32 = 2;
/// Conventional exit code after SIGINT
const EXIT_INTERRUPTED: i32 = 130;

/// Checks URLs against blacklist, reputation, phishing, TLS, public suffix and WHOIS signals.
#[derive(Debug, Parser)]
#[command(name = "phishguard", version, about)]
struct Cli {
    /// Log level
    #[arg(long, value_enum, default_value = "info", global = true)]
    log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value = "plain", global = true)]
    log_format: LogFormat,

    /// Per-call timeout in seconds for the HTTP-based providers
    #[arg(long, default_value_t = PROVIDER_HTTP_TIMEOUT_SECS, global = true)]
    timeout_seconds: u64,

    /// Verification requests allowed per caller per minute (serve only)
    #[arg(long, default_value_t = RATE_LIMIT_REQUESTS, global = true)]
    rate_limit: u32,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Verify one URL and print the report as JSON
    Verify {
        /// URL to verify; `https://` is assumed when no scheme is given
        url: String,
    },
    /// Run the HTTP API
    Serve {
        /// Address to listen on
        #[arg(long, default_value = DEFAULT_BIND_ADDR)]
        bind: SocketAddr,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists)
    // This allows setting the provider API keys in .env without exporting them manually
    // Try loading from current directory first, then from the executable's directory
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let cli = Cli::parse();

    init_logger_with(cli.log_level.clone().into(), cli.log_format.clone())
        .context("Failed to initialize logger")?;

    // Initialize crypto provider for TLS operations
    init_crypto_provider();

    let bind_addr = match &cli.command {
        Command::Serve { bind } => *bind,
        Command::Verify { .. } => Config::default_bind_addr(),
    };
    let config = Config {
        log_level: cli.log_level,
        log_format: cli.log_format,
        timeout_seconds: cli.timeout_seconds,
        credentials: ProviderCredentials::from_env(),
        rate_limit_requests: cli.rate_limit,
        bind_addr,
        ..Default::default()
    };
    log::debug!("Credentials configured: {:?}", config.credentials);

    let verifier =
        Arc::new(Verifier::from_config(&config).context("Failed to initialize providers")?);

    let shutdown = CancellationToken::new();
    let on_ctrl_c = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::info!("Ctrl-C received, shutting down");
            on_ctrl_c.cancel();
        }
    });

    match cli.command {
        Command::Verify { url } => match verifier.verify_until_cancelled(&url, &shutdown).await {
            Ok(report) => {
                let json = serde_json::to_string_pretty(&report)
                    .context("Failed to serialize report")?;
                println!("{json}");
                Ok(())
            }
            Err(VerifyError::Validation(e)) => {
                eprintln!("phishguard: invalid URL ({}): {}", e.code(), e);
                process::exit(EXIT_INVALID_URL);
            }
            Err(VerifyError::Cancelled) => {
                eprintln!("phishguard: interrupted");
                process::exit(EXIT_INTERRUPTED);
            }
        },
        Command::Serve { .. } => {
            let state = AppState {
                verifier,
                rate_limiter: Arc::new(RateLimiter::new(
                    config.rate_limit_requests,
                    config.rate_limit_window,
                )),
                shutdown,
            };
            start_server(config.bind_addr, state).await
        }
    }
}
