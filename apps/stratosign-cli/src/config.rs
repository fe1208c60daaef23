//! Command configuration loaded from environment variables.

use anyhow::{Context, Result};
use stratosign_auth::Capability;

/// What to sign and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignConfig {
    /// Target host.
    pub host: String,
    /// Target port.
    pub port: u16,
    /// HTTP method.
    pub method: String,
    /// Request path.
    pub path: String,
    /// Provider name (`aws` or `google`).
    pub provider: String,
    /// Comma-separated capability tags; empty means any handler.
    pub capabilities: String,
    /// Query parameters as `k=v&k=v`, taken literally.
    pub params: String,
    /// Log level filter string.
    pub log_level: String,
}

impl Default for SignConfig {
    fn default() -> Self {
        Self {
            host: String::from("sdb.amazonaws.com"),
            port: 443,
            method: String::from("GET"),
            path: String::from("/"),
            provider: String::from("aws"),
            capabilities: String::new(),
            params: String::new(),
            log_level: String::from("info"),
        }
    }
}

impl SignConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `SIGN_HOST` | `sdb.amazonaws.com` |
    /// | `SIGN_PORT` | `443` |
    /// | `SIGN_METHOD` | `GET` |
    /// | `SIGN_PATH` | `/` |
    /// | `SIGN_PROVIDER` | `aws` |
    /// | `SIGN_CAPABILITY` | *(empty)* |
    /// | `SIGN_PARAMS` | *(empty)* |
    /// | `LOG_LEVEL` | `info` |
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("SIGN_HOST") {
            config.host = v;
        }
        if let Ok(v) = std::env::var("SIGN_PORT") {
            config.port = v
                .parse()
                .with_context(|| format!("invalid SIGN_PORT: {v}"))?;
        }
        if let Ok(v) = std::env::var("SIGN_METHOD") {
            config.method = v;
        }
        if let Ok(v) = std::env::var("SIGN_PATH") {
            config.path = v;
        }
        if let Ok(v) = std::env::var("SIGN_PROVIDER") {
            config.provider = v;
        }
        if let Ok(v) = std::env::var("SIGN_CAPABILITY") {
            config.capabilities = v;
        }
        if let Ok(v) = std::env::var("SIGN_PARAMS") {
            config.params = v;
        }
        if let Ok(v) = std::env::var("LOG_LEVEL") {
            config.log_level = v;
        }

        Ok(config)
    }

    /// Requested capabilities.
    pub fn capabilities(&self) -> Result<Vec<Capability>> {
        self.capabilities
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(|tag| {
                tag.parse::<Capability>()
                    .with_context(|| format!("invalid SIGN_CAPABILITY: {tag}"))
            })
            .collect()
    }

    /// Query parameters in the order given. A pair without `=` has an empty value.
    #[must_use]
    pub fn params(&self) -> Vec<(String, String)> {
        self.params
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| match pair.split_once('=') {
                Some((k, v)) => (k.to_owned(), v.to_owned()),
                None => (pair.to_owned(), String::new()),
            })
            .collect()
    }

    /// `http` on port 80, `https` otherwise.
    #[must_use]
    pub fn protocol(&self) -> &'static str {
        if self.port == 80 { "http" } else { "https" }
    }
}
