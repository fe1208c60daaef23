//! Error types for the stratosign core.

/// Errors raised by a [`ConfigSource`](crate::ConfigSource) lookup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The requested option does not exist in the given section.
    #[error("no option {key:?} in section {section:?}")]
    MissingOption {
        /// Section that was searched.
        section: String,
        /// Key that was requested.
        key: String,
    },
}

/// Errors raised while converting an [`HttpRequest`](crate::HttpRequest) into
/// an [`http::Request`] for the transport.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// The request method is not a valid HTTP method token.
    #[error("invalid HTTP method: {0}")]
    InvalidMethod(String),

    /// A header name or value cannot be represented on the wire.
    #[error("invalid header {0}")]
    InvalidHeader(String),

    /// Any other failure reported by the `http` builder.
    #[error(transparent)]
    Http(#[from] http::Error),
}
