//! Query-string signature authentication (versions 0, 1 and 2).
//!
//! Used by the AWS query APIs (EC2, SQS, SimpleDB, ...) but never by S3. The
//! access key, signature version, and timestamp are added to the request
//! parameters, the version-specific signature is computed, and the parameters
//! are folded into the path (or the form body for `POST`) together with the
//! `Signature` parameter:
//!
//! | Version | Signed data | Parameter order | Algorithm |
//! |---------|-------------|-----------------|-----------|
//! | 0 | `Action` + `Timestamp` values | case-insensitive | HMAC-SHA1 |
//! | 1 | every key then value, no separators | case-insensitive | HMAC-SHA1 |
//! | 2 | `VERB\nhost\npath\n` + canonical query | byte order | HMAC-SHA256 or HMAC-SHA1 |

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use hmac::Mac;
use stratosign_core::{ConfigSource, HttpRequest, Provider};
use tracing::debug;

use crate::canonical::{
    build_case_insensitive_query, build_ordinal_query, quote, sort_case_insensitive,
};
use crate::credentials::resolve_credentials;
use crate::error::{AuthError, NotReadyReason};
use crate::handler::{AuthHandler, Capability, HandlerFactory, Readiness};
use crate::hmac_auth::S3_ENDPOINT;
use crate::keys::{HmacKeys, encode_digest};

/// Domain of the AWS query services.
pub const AWS_DOMAIN: &str = ".amazonaws.com";

/// Content type of a signed `POST` body.
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";

/// UTC timestamp format of the `Timestamp` parameter.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Query string and base64 signature produced by a signature version.
pub type SignedQuery = (String, String);

/// Shared state and request plumbing of the query-signature handlers.
#[derive(Debug, Clone)]
pub struct QuerySigner {
    keys: HmacKeys,
}

impl QuerySigner {
    /// Instantiate the shared signer, performing the readiness checks.
    ///
    /// Ready when credentials exist for `provider` and `host` is an AWS query
    /// service (any `*.amazonaws.com` host except S3).
    pub fn new(
        handler: &'static str,
        host: &str,
        config: &dyn ConfigSource,
        provider: &Provider,
    ) -> Result<Readiness<Self>, AuthError> {
        let Some(credentials) = resolve_credentials(config, provider)? else {
            return Ok(Readiness::NotReady(NotReadyReason::CredentialsNotAvailable {
                provider: provider.name.clone(),
            }));
        };

        if !host.ends_with(AWS_DOMAIN) || host.ends_with(S3_ENDPOINT) {
            return Ok(Readiness::NotReady(NotReadyReason::HandlerNotApplicable {
                handler,
                host: host.to_owned(),
            }));
        }

        Ok(Readiness::Ready(Self::from_keys(HmacKeys::new(credentials))))
    }

    /// Build the signer from already-resolved keys.
    #[must_use]
    pub fn from_keys(keys: HmacKeys) -> Self {
        Self { keys }
    }

    /// The keyed-hash context.
    #[must_use]
    pub fn keys(&self) -> &HmacKeys {
        &self.keys
    }

    /// Add the signing parameters, sign with `calc`, and fold the result into
    /// the request. The request parameters are empty afterwards.
    fn add_auth<F>(
        &self,
        request: &mut HttpRequest,
        now: DateTime<Utc>,
        version: &str,
        calc: F,
    ) -> Result<(), AuthError>
    where
        F: FnOnce(
            &mut BTreeMap<String, String>,
            &str,
            &str,
            &str,
        ) -> Result<SignedQuery, AuthError>,
    {
        let server_name = request.server_name();
        let params = &mut request.params;
        params.insert("AWSAccessKeyId".to_owned(), self.keys.access_key().to_owned());
        params.insert("SignatureVersion".to_owned(), version.to_owned());
        params.insert("Timestamp".to_owned(), now.format(TIMESTAMP_FORMAT).to_string());

        let (query, signature) = calc(params, &request.method, &request.path, &server_name)?;
        debug!(query_string = %query, signature = %signature, "Computed query signature");

        let signed = format!("{query}&Signature={}", quote(&signature));
        if request.method == "POST" {
            request
                .headers
                .insert("Content-Type".to_owned(), FORM_CONTENT_TYPE.to_owned());
            request.body = signed;
        } else {
            request.body.clear();
            request.path = format!("{}?{signed}", request.path);
        }

        request.params.clear();
        Ok(())
    }
}

/// Query signature version 0: signs only the `Action` and `Timestamp` values.
#[derive(Debug, Clone)]
pub struct QuerySignatureV0Handler {
    signer: QuerySigner,
}

impl QuerySignatureV0Handler {
    /// Handler name reported in resolution diagnostics.
    pub const NAME: &str = "QuerySignatureV0AuthHandler";
    /// Value of the `SignatureVersion` parameter.
    pub const VERSION: &str = "0";

    /// Instantiate the handler for `host`.
    pub fn new(
        host: &str,
        config: &dyn ConfigSource,
        provider: &Provider,
    ) -> Result<Readiness<Self>, AuthError> {
        Ok(QuerySigner::new(Self::NAME, host, config, provider)?.map(|signer| Self { signer }))
    }

    /// Build the handler from already-resolved keys.
    #[must_use]
    pub fn from_keys(keys: HmacKeys) -> Self {
        Self {
            signer: QuerySigner::from_keys(keys),
        }
    }

    /// Registration entry for the handler resolver.
    #[must_use]
    pub fn factory() -> HandlerFactory {
        HandlerFactory {
            name: Self::NAME,
            capabilities: &[Capability::SignV0],
            build: |host, config, provider| Ok(Self::new(host, config, provider)?.boxed()),
        }
    }

    /// Compute the query string and signature for `params`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::MissingParameter`] if `Action` or `Timestamp` is absent.
    pub fn calc_signature(
        &self,
        params: &BTreeMap<String, String>,
    ) -> Result<SignedQuery, AuthError> {
        let action = required(params, "Action")?;
        let timestamp = required(params, "Timestamp")?;

        let mut mac = self.signer.keys().sha1();
        mac.update(action.as_bytes());
        mac.update(timestamp.as_bytes());

        let query = build_case_insensitive_query(params);
        Ok((query, encode_digest(&mac.finalize().into_bytes())))
    }
}

impl AuthHandler for QuerySignatureV0Handler {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn add_auth_at(&self, request: &mut HttpRequest, now: DateTime<Utc>) -> Result<(), AuthError> {
        // Checked up front so a rejected request keeps its original parameters.
        required(&request.params, "Action")?;
        self.signer
            .add_auth(request, now, Self::VERSION, |params, _, _, _| {
                self.calc_signature(params)
            })
    }
}

/// Query signature version 1: signs every key and value in case-insensitive order.
#[derive(Debug, Clone)]
pub struct QuerySignatureV1Handler {
    signer: QuerySigner,
}

impl QuerySignatureV1Handler {
    /// Handler name reported in resolution diagnostics.
    pub const NAME: &str = "QuerySignatureV1AuthHandler";
    /// Value of the `SignatureVersion` parameter.
    pub const VERSION: &str = "1";

    /// Instantiate the handler for `host`.
    pub fn new(
        host: &str,
        config: &dyn ConfigSource,
        provider: &Provider,
    ) -> Result<Readiness<Self>, AuthError> {
        Ok(QuerySigner::new(Self::NAME, host, config, provider)?.map(|signer| Self { signer }))
    }

    /// Build the handler from already-resolved keys.
    #[must_use]
    pub fn from_keys(keys: HmacKeys) -> Self {
        Self {
            signer: QuerySigner::from_keys(keys),
        }
    }

    /// Registration entry for the handler resolver.
    #[must_use]
    pub fn factory() -> HandlerFactory {
        HandlerFactory {
            name: Self::NAME,
            capabilities: &[Capability::SignV1],
            build: |host, config, provider| Ok(Self::new(host, config, provider)?.boxed()),
        }
    }

    /// Compute the query string and signature for `params`.
    #[must_use]
    pub fn calc_signature(&self, params: &BTreeMap<String, String>) -> SignedQuery {
        let mut mac = self.signer.keys().sha1();
        for (key, value) in sort_case_insensitive(params) {
            mac.update(key.as_bytes());
            mac.update(value.as_bytes());
        }

        let query = build_case_insensitive_query(params);
        (query, encode_digest(&mac.finalize().into_bytes()))
    }
}

impl AuthHandler for QuerySignatureV1Handler {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn add_auth_at(&self, request: &mut HttpRequest, now: DateTime<Utc>) -> Result<(), AuthError> {
        self.signer
            .add_auth(request, now, Self::VERSION, |params, _, _, _| {
                Ok(self.calc_signature(params))
            })
    }
}

/// Query signature version 2: signs the verb, host, path, and canonical query.
#[derive(Debug, Clone)]
pub struct QuerySignatureV2Handler {
    signer: QuerySigner,
}

impl QuerySignatureV2Handler {
    /// Handler name reported in resolution diagnostics.
    pub const NAME: &str = "QuerySignatureV2AuthHandler";
    /// Value of the `SignatureVersion` parameter.
    pub const VERSION: &str = "2";

    /// Instantiate the handler for `host`.
    pub fn new(
        host: &str,
        config: &dyn ConfigSource,
        provider: &Provider,
    ) -> Result<Readiness<Self>, AuthError> {
        Ok(QuerySigner::new(Self::NAME, host, config, provider)?.map(|signer| Self { signer }))
    }

    /// Build the handler from already-resolved keys.
    #[must_use]
    pub fn from_keys(keys: HmacKeys) -> Self {
        Self {
            signer: QuerySigner::from_keys(keys),
        }
    }

    /// Registration entry for the handler resolver.
    #[must_use]
    pub fn factory() -> HandlerFactory {
        HandlerFactory {
            name: Self::NAME,
            capabilities: &[Capability::SignV2],
            build: |host, config, provider| Ok(Self::new(host, config, provider)?.boxed()),
        }
    }

    /// Build the version 2 string to sign.
    ///
    /// ```text
    /// HTTPVerb + "\n" +
    /// lowercase(ServerName) + "\n" +
    /// Path + "\n" +
    /// CanonicalQueryString
    /// ```
    #[must_use]
    pub fn string_to_sign(verb: &str, server_name: &str, path: &str, query: &str) -> String {
        format!(
            "{verb}\n{}\n{path}\n{query}",
            server_name.to_ascii_lowercase()
        )
    }

    /// Compute the query string and signature, adding `SignatureMethod` to `params`.
    #[must_use]
    pub fn calc_signature(
        &self,
        params: &mut BTreeMap<String, String>,
        verb: &str,
        path: &str,
        server_name: &str,
    ) -> SignedQuery {
        let keys = self.signer.keys();
        params.insert(
            "SignatureMethod".to_owned(),
            keys.signature_method().to_owned(),
        );

        let query = build_ordinal_query(params);
        let string_to_sign = Self::string_to_sign(verb, server_name, path, &query);
        debug!(string_to_sign = ?string_to_sign, "Built string to sign");

        let signature = encode_digest(&keys.sign_preferred(string_to_sign.as_bytes()));
        (query, signature)
    }
}

impl AuthHandler for QuerySignatureV2Handler {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn add_auth_at(&self, request: &mut HttpRequest, now: DateTime<Utc>) -> Result<(), AuthError> {
        self.signer
            .add_auth(request, now, Self::VERSION, |params, verb, path, server_name| {
                Ok(self.calc_signature(params, verb, path, server_name))
            })
    }
}

fn required<'a>(params: &'a BTreeMap<String, String>, key: &str) -> Result<&'a str, AuthError> {
    params
        .get(key)
        .map(String::as_str)
        .ok_or_else(|| AuthError::MissingParameter(key.to_owned()))
}
