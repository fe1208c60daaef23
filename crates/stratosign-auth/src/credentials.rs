//! Credential resolution.
//!
//! Access keys are read from the `Credentials` section of a [`ConfigSource`],
//! using option names that depend on the [`Provider`]:
//!
//! | Provider | Access key option | Secret key option |
//! |----------|-------------------|-------------------|
//! | `aws` | `aws_access_key_id` | `aws_secret_access_key` |
//! | `google` | `gs_access_key_id` | `gs_secret_access_key` |

use std::fmt;

use stratosign_core::{CREDENTIALS_SECTION, ConfigError, ConfigSource, Provider};
use tracing::debug;

/// An access key and its secret.
///
/// The `Debug` output never contains the secret key.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    access_key: String,
    secret_key: String,
}

impl Credentials {
    /// Create credentials from an access key ID and secret access key.
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
        }
    }

    /// The access key ID.
    #[must_use]
    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    /// The secret access key.
    #[must_use]
    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// Option names holding the access key and secret key for a provider.
fn key_options(provider: &Provider) -> Option<(&'static str, &'static str)> {
    match provider.as_str() {
        Provider::AWS => Some(("aws_access_key_id", "aws_secret_access_key")),
        Provider::GOOGLE => Some(("gs_access_key_id", "gs_secret_access_key")),
        _ => None,
    }
}

/// Resolve the credentials for `provider` from `config`.
///
/// Returns `Ok(None)` when the provider is unknown or its secret key is not
/// configured.
///
/// # Errors
///
/// Returns [`ConfigError`] when the secret key is configured but the access
/// key is not.
///
/// # Examples
///
/// ```
/// use stratosign_auth::credentials::resolve_credentials;
/// use stratosign_core::{Provider, StaticConfig};
///
/// let config = StaticConfig::new()
///     .with_option("Credentials", "gs_access_key_id", "GOOGKEY")
///     .with_option("Credentials", "gs_secret_access_key", "secret");
///
/// let creds = resolve_credentials(&config, &Provider::google()).unwrap().unwrap();
/// assert_eq!(creds.access_key(), "GOOGKEY");
/// assert!(resolve_credentials(&config, &Provider::aws()).unwrap().is_none());
/// ```
pub fn resolve_credentials(
    config: &dyn ConfigSource,
    provider: &Provider,
) -> Result<Option<Credentials>, ConfigError> {
    let Some((access_option, secret_option)) = key_options(provider) else {
        return Ok(None);
    };

    if !config.has(CREDENTIALS_SECTION, secret_option) {
        return Ok(None);
    }

    let secret_key = config.get(CREDENTIALS_SECTION, secret_option)?;
    let access_key = config.get(CREDENTIALS_SECTION, access_option)?;
    debug!(provider = %provider, access_key = %access_key, "Resolved credentials");
    Ok(Some(Credentials::new(access_key, secret_key)))
}
