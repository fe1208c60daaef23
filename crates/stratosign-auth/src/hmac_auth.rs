//! `Authorization` header signing for storage services.
//!
//! The header has the format:
//!
//! ```text
//! <auth-scheme> <AccessKeyId>:<Signature>
//! ```
//!
//! Where `Signature = Base64(HMAC-SHA1(SecretKey, CanonicalString))` and the
//! canonical string is built by [`canonical_string`] over the request method,
//! the bucket-qualified path, and the request headers.

use chrono::{DateTime, Utc};
use stratosign_core::{ConfigSource, HttpRequest, Provider};
use tracing::debug;

use crate::canonical::canonical_string;
use crate::credentials::resolve_credentials;
use crate::error::{AuthError, NotReadyReason};
use crate::handler::{AuthHandler, Capability, HandlerFactory, Readiness};
use crate::keys::{HmacKeys, encode_digest};

/// Amazon S3 endpoint suffix.
pub const S3_ENDPOINT: &str = "s3.amazonaws.com";
/// Google Cloud Storage interoperable endpoint suffix.
pub const GS_ENDPOINT: &str = "commondatastorage.googleapis.com";

const STORAGE_ENDPOINTS: [&str; 2] = [S3_ENDPOINT, GS_ENDPOINT];

/// RFC 1123 date in GMT, as sent in the `Date` header.
const DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Header-based HMAC-SHA1 authentication for S3 and Google Cloud Storage.
#[derive(Debug, Clone)]
pub struct HmacAuthHandler {
    keys: HmacKeys,
    provider: Provider,
}

impl HmacAuthHandler {
    /// Handler name reported in resolution diagnostics.
    pub const NAME: &str = "HmacAuthHandler";

    /// Instantiate the handler for `host`.
    ///
    /// Ready when credentials exist for `provider` and `host` is a storage
    /// endpoint.
    pub fn new(
        host: &str,
        config: &dyn ConfigSource,
        provider: &Provider,
    ) -> Result<Readiness<Self>, AuthError> {
        let Some(credentials) = resolve_credentials(config, provider)? else {
            return Ok(Readiness::NotReady(NotReadyReason::CredentialsNotAvailable {
                provider: provider.name.clone(),
            }));
        };

        if !STORAGE_ENDPOINTS.iter().any(|e| host.ends_with(e)) {
            return Ok(Readiness::NotReady(NotReadyReason::HandlerNotApplicable {
                handler: Self::NAME,
                host: host.to_owned(),
            }));
        }

        Ok(Readiness::Ready(Self::from_keys(
            HmacKeys::new(credentials),
            provider.clone(),
        )))
    }

    /// Build the handler from already-resolved keys, skipping readiness checks.
    #[must_use]
    pub fn from_keys(keys: HmacKeys, provider: Provider) -> Self {
        Self { keys, provider }
    }

    /// Registration entry for the handler resolver.
    #[must_use]
    pub fn factory() -> HandlerFactory {
        HandlerFactory {
            name: Self::NAME,
            capabilities: &[Capability::SignHeader],
            build: |host, config, provider| Ok(Self::new(host, config, provider)?.boxed()),
        }
    }

    /// Compute the base64 signature of a canonical string.
    #[must_use]
    pub fn sign(&self, canonical: &str) -> String {
        encode_digest(&self.keys.sign_sha1(canonical.as_bytes()))
            .trim_end()
            .to_owned()
    }
}

/// Bucket prefix of a virtual-hosted storage host: `/<bucket>` or empty.
fn bucket_prefix(host: &str) -> String {
    STORAGE_ENDPOINTS
        .iter()
        .find_map(|endpoint| host.find(&format!(".{endpoint}")))
        .map(|i| format!("/{}", &host[..i]))
        .unwrap_or_default()
}

impl AuthHandler for HmacAuthHandler {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn add_auth_at(&self, request: &mut HttpRequest, now: DateTime<Utc>) -> Result<(), AuthError> {
        let auth_path = format!("{}{}", bucket_prefix(&request.host), request.path);

        if !request.headers.contains_key("Date") {
            request
                .headers
                .insert("Date".to_owned(), now.format(DATE_FORMAT).to_string());
        }

        let canonical = canonical_string(
            &request.method,
            &auth_path,
            &request.headers,
            None,
            &self.provider,
        );
        debug!(canonical = ?canonical, "Built canonical string");

        let signature = self.sign(&canonical);
        request.headers.insert(
            "Authorization".to_owned(),
            format!(
                "{} {}:{signature}",
                self.provider.auth_header,
                self.keys.access_key()
            ),
        );

        Ok(())
    }
}
