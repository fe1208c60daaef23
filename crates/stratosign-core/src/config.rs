//! Configuration lookup used to resolve credentials.
//!
//! Configuration is organised in sections of key/value options, the same shape
//! as a classic INI credentials file. Loading such a file is left to the
//! caller; this module only defines the lookup contract and an in-memory
//! implementation that can be populated from environment variables.

use std::collections::BTreeMap;

use crate::error::ConfigError;

/// Section holding access keys.
pub const CREDENTIALS_SECTION: &str = "Credentials";

/// Environment variables read by [`StaticConfig::from_env`], with the option
/// each one populates in the `Credentials` section.
const ENV_CREDENTIALS: &[(&str, &str)] = &[
    ("AWS_ACCESS_KEY_ID", "aws_access_key_id"),
    ("AWS_SECRET_ACCESS_KEY", "aws_secret_access_key"),
    ("GS_ACCESS_KEY_ID", "gs_access_key_id"),
    ("GS_SECRET_ACCESS_KEY", "gs_secret_access_key"),
];

/// Read-only, section-based option lookup.
pub trait ConfigSource: Send + Sync {
    /// Whether `key` is present in `section`.
    fn has(&self, section: &str, key: &str) -> bool;

    /// Retrieve the value of `key` in `section`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingOption`] if the option is not present.
    fn get(&self, section: &str, key: &str) -> Result<String, ConfigError>;
}

/// In-memory configuration backed by nested `BTreeMap`s.
///
/// # Examples
///
/// ```
/// use stratosign_core::{ConfigSource, StaticConfig};
///
/// let config = StaticConfig::new()
///     .with_option("Credentials", "aws_access_key_id", "AKIDEXAMPLE")
///     .with_option("Credentials", "aws_secret_access_key", "secret");
///
/// assert!(config.has("Credentials", "aws_secret_access_key"));
/// assert_eq!(config.get("Credentials", "aws_access_key_id").unwrap(), "AKIDEXAMPLE");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct StaticConfig {
    sections: BTreeMap<String, BTreeMap<String, String>>,
}

impl StaticConfig {
    /// Create an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the configuration with `key` set to `value` in `section`.
    #[must_use]
    pub fn with_option(
        mut self,
        section: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.set(section, key, value);
        self
    }

    /// Set `key` to `value` in `section`, replacing any previous value.
    pub fn set(
        &mut self,
        section: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.sections
            .entry(section.into())
            .or_default()
            .insert(key.into(), value.into());
    }

    /// Load credentials from environment variables.
    ///
    /// | Variable | Option |
    /// |----------|--------|
    /// | `AWS_ACCESS_KEY_ID` | `Credentials.aws_access_key_id` |
    /// | `AWS_SECRET_ACCESS_KEY` | `Credentials.aws_secret_access_key` |
    /// | `GS_ACCESS_KEY_ID` | `Credentials.gs_access_key_id` |
    /// | `GS_SECRET_ACCESS_KEY` | `Credentials.gs_secret_access_key` |
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        for (var, key) in ENV_CREDENTIALS {
            if let Some(value) = lookup(*var) {
                tracing::debug!(option = %key, "loaded credential option from environment");
                config.set(CREDENTIALS_SECTION, *key, value);
            }
        }
        config
    }
}

impl ConfigSource for StaticConfig {
    fn has(&self, section: &str, key: &str) -> bool {
        self.sections
            .get(section)
            .is_some_and(|options| options.contains_key(key))
    }

    fn get(&self, section: &str, key: &str) -> Result<String, ConfigError> {
        self.sections
            .get(section)
            .and_then(|options| options.get(key))
            .cloned()
            .ok_or_else(|| ConfigError::MissingOption {
                section: section.to_owned(),
                key: key.to_owned(),
            })
    }
}
