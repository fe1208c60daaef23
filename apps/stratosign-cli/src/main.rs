//! Stratosign - sign AWS and Google Cloud Storage requests.
//!
//! Resolves the single authentication handler ready for the target host,
//! signs the described request, and prints it as JSON on stdout.
//!
//! # Usage
//!
//! ```text
//! AWS_ACCESS_KEY_ID=... AWS_SECRET_ACCESS_KEY=... \
//! SIGN_HOST=sdb.amazonaws.com SIGN_CAPABILITY=sign-v2 \
//! SIGN_PARAMS='Action=ListDomains' stratosign
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `SIGN_HOST` | `sdb.amazonaws.com` | Target host |
//! | `SIGN_PORT` | `443` | Target port |
//! | `SIGN_METHOD` | `GET` | HTTP method |
//! | `SIGN_PATH` | `/` | Request path |
//! | `SIGN_PROVIDER` | `aws` | `aws` or `google` |
//! | `SIGN_CAPABILITY` | *(unset)* | Comma-separated capability tags |
//! | `SIGN_PARAMS` | *(unset)* | Parameters as `k=v&k=v` |
//! | `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY` | *(unset)* | AWS credentials |
//! | `GS_ACCESS_KEY_ID` / `GS_SECRET_ACCESS_KEY` | *(unset)* | Google credentials |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

mod config;

use anyhow::{Context, Result};
use stratosign_auth::{default_handlers, resolve_handler};
use stratosign_core::{HttpRequest, Provider, StaticConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::SignConfig;

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
/// Logs go to stderr so stdout carries only the signed request.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

/// Build the unsigned request described by the configuration.
fn build_request(config: &SignConfig) -> HttpRequest {
    config.params().into_iter().fold(
        HttpRequest::builder()
            .method(config.method.as_str())
            .protocol(config.protocol())
            .host(config.host.as_str())
            .port(config.port)
            .path(config.path.as_str())
            .build(),
        |request, (k, v)| request.with_param(k, v),
    )
}

fn main() -> Result<()> {
    let config = SignConfig::from_env()?;

    init_tracing(&config.log_level)?;

    let provider = Provider::from_name(&config.provider)
        .with_context(|| format!("unknown provider: {}", config.provider))?;
    let capabilities = config.capabilities()?;

    info!(
        host = %config.host,
        port = config.port,
        provider = %provider,
        capabilities = ?capabilities,
        "resolving auth handler",
    );

    let handler = resolve_handler(
        &config.host,
        &StaticConfig::from_env(),
        &provider,
        &capabilities,
        &default_handlers(),
    )?;

    let mut request = build_request(&config);
    handler.add_auth(&mut request)?;

    info!(handler = handler.name(), "signed request");

    println!("{}", serde_json::to_string_pretty(&request)?);

    Ok(())
}
