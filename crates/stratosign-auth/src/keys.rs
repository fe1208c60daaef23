//! Keyed-hash contexts derived from a secret key.
//!
//! [`HmacKeys`] keys an HMAC-SHA1 context and, when the `hmac-sha256` feature
//! is enabled, an HMAC-SHA256 context once per handler. The keyed contexts are
//! templates: every signing operation clones one and feeds the clone, so the
//! templates themselves are never updated and may be shared across threads.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, KeyInit, Mac};
use sha1::Sha1;
use sha2::Sha256;

use crate::credentials::Credentials;

/// HMAC-SHA1 keyed context.
pub type HmacSha1 = Hmac<Sha1>;
/// HMAC-SHA256 keyed context.
pub type HmacSha256 = Hmac<Sha256>;

/// Algorithm name sent as `SignatureMethod` when signing with HMAC-SHA1.
pub const HMAC_SHA1: &str = "HmacSHA1";
/// Algorithm name sent as `SignatureMethod` when signing with HMAC-SHA256.
pub const HMAC_SHA256: &str = "HmacSHA256";

/// Credentials together with the keyed-hash templates built from the secret.
#[derive(Clone)]
pub struct HmacKeys {
    credentials: Credentials,
    sha1: HmacSha1,
    sha256: Option<HmacSha256>,
}

impl HmacKeys {
    /// Key the hash contexts with the secret of `credentials`.
    ///
    /// The SHA-256 context is present when the `hmac-sha256` feature is enabled.
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        Self::build(credentials, cfg!(feature = "hmac-sha256"))
    }

    /// Key only the SHA-1 context; SHA-256 signing falls back to SHA-1.
    #[must_use]
    pub fn sha1_only(credentials: Credentials) -> Self {
        Self::build(credentials, false)
    }

    fn build(credentials: Credentials, with_sha256: bool) -> Self {
        let secret = credentials.secret_key().as_bytes();
        let sha1 = HmacSha1::new_from_slice(secret).expect("HMAC can accept any key length");
        let sha256 = with_sha256.then(|| {
            HmacSha256::new_from_slice(secret).expect("HMAC can accept any key length")
        });
        Self {
            credentials,
            sha1,
            sha256,
        }
    }

    /// The access key ID these keys sign for.
    #[must_use]
    pub fn access_key(&self) -> &str {
        self.credentials.access_key()
    }

    /// Whether an HMAC-SHA256 context is available.
    #[must_use]
    pub fn has_sha256(&self) -> bool {
        self.sha256.is_some()
    }

    /// A fresh HMAC-SHA1 state for incremental updates.
    #[must_use]
    pub fn sha1(&self) -> HmacSha1 {
        self.sha1.clone()
    }

    /// HMAC-SHA1 digest of `message`.
    #[must_use]
    pub fn sign_sha1(&self, message: &[u8]) -> Vec<u8> {
        let mut mac = self.sha1();
        mac.update(message);
        mac.finalize().into_bytes().to_vec()
    }

    /// Name of the strongest available algorithm (`HmacSHA256` or `HmacSHA1`).
    #[must_use]
    pub fn signature_method(&self) -> &'static str {
        if self.sha256.is_some() {
            HMAC_SHA256
        } else {
            HMAC_SHA1
        }
    }

    /// Digest of `message` with the algorithm named by [`Self::signature_method`].
    #[must_use]
    pub fn sign_preferred(&self, message: &[u8]) -> Vec<u8> {
        match &self.sha256 {
            Some(template) => {
                let mut mac = template.clone();
                mac.update(message);
                mac.finalize().into_bytes().to_vec()
            }
            None => self.sign_sha1(message),
        }
    }
}

impl fmt::Debug for HmacKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HmacKeys")
            .field("credentials", &self.credentials)
            .field("signature_method", &self.signature_method())
            .finish_non_exhaustive()
    }
}

/// Base64-encode a digest.
#[must_use]
pub fn encode_digest(digest: &[u8]) -> String {
    BASE64.encode(digest)
}
