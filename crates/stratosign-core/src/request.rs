//! The outgoing request value that authentication handlers sign.

use std::collections::BTreeMap;

use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use typed_builder::TypedBuilder;

use crate::error::RequestError;

/// Default port for plain HTTP; omitted from the server name when signing.
const DEFAULT_HTTP_PORT: u16 = 80;

/// An outgoing HTTP request prior to transmission.
///
/// Authentication handlers read the method, host, path, and parameters and
/// write back headers, parameters, path, or body. Header names are stored
/// exactly as given, so `Date` and `date` are distinct keys.
///
/// # Examples
///
/// ```
/// use stratosign_core::HttpRequest;
///
/// let request = HttpRequest::builder()
///     .method("GET")
///     .host("ec2.amazonaws.com")
///     .port(443)
///     .path("/")
///     .build();
///
/// assert_eq!(request.server_name(), "ec2.amazonaws.com:443");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpRequest {
    /// HTTP method (`GET`, `POST`, ...), compared case-sensitively.
    #[builder(setter(into))]
    pub method: String,

    /// URL scheme used by the transport.
    #[builder(default = String::from("https"), setter(into))]
    pub protocol: String,

    /// Target host name without port.
    #[builder(setter(into))]
    pub host: String,

    /// Target port.
    #[builder(default = 443)]
    pub port: u16,

    /// Request path, possibly carrying a query string once signed.
    #[builder(default = String::from("/"), setter(into))]
    pub path: String,

    /// Request headers keyed by name as stored.
    #[builder(default)]
    pub headers: BTreeMap<String, String>,

    /// Query or form parameters awaiting signing.
    #[builder(default)]
    pub params: BTreeMap<String, String>,

    /// Request body.
    #[builder(default, setter(into))]
    pub body: String,
}

impl HttpRequest {
    /// Host name as used in signatures: `host` on port 80, `host:port` otherwise.
    #[must_use]
    pub fn server_name(&self) -> String {
        if self.port == DEFAULT_HTTP_PORT {
            self.host.clone()
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    /// Return the request with an additional header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Return the request with an additional parameter.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Convert into an [`http::Request`] for the transport.
    ///
    /// Parameters that were not folded into the path by a signer are appended
    /// as a percent-encoded query string.
    pub fn into_http(self) -> Result<http::Request<String>, RequestError> {
        let method = http::Method::from_bytes(self.method.as_bytes())
            .map_err(|_| RequestError::InvalidMethod(self.method.clone()))?;

        let mut uri = format!("{}://{}:{}{}", self.protocol, self.host, self.port, self.path);
        if !self.params.is_empty() {
            let query = self
                .params
                .iter()
                .map(|(k, v)| {
                    format!(
                        "{}={}",
                        utf8_percent_encode(k, NON_ALPHANUMERIC),
                        utf8_percent_encode(v, NON_ALPHANUMERIC)
                    )
                })
                .collect::<Vec<_>>()
                .join("&");
            uri.push(if self.path.contains('?') { '&' } else { '?' });
            uri.push_str(&query);
        }

        let mut builder = http::Request::builder().method(method).uri(uri);
        for (name, value) in &self.headers {
            let name = http::HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| RequestError::InvalidHeader(name.clone()))?;
            let value = http::HeaderValue::from_str(value)
                .map_err(|_| RequestError::InvalidHeader(name.to_string()))?;
            builder = builder.header(name, value);
        }

        Ok(builder.body(self.body)?)
    }
}
