//! Error types for request authentication.
//!
//! Resolution failures that the caller must see are represented by
//! [`AuthError`]. The reasons an individual handler declines to sign are
//! [`NotReadyReason`] values; the resolver folds those into its diagnostics
//! instead of reporting them one by one.

use stratosign_core::ConfigError;

/// Errors that can occur while selecting a handler or signing a request.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No candidate handler was ready to authenticate.
    #[error("No handler was ready to authenticate. {checked} handlers were checked. {names:?}")]
    NoAuthHandlerFound {
        /// Number of candidates that were instantiated.
        checked: usize,
        /// Names of the candidates that were instantiated.
        names: Vec<String>,
    },

    /// More than one candidate handler was ready, so the target account is ambiguous.
    #[error("{} AuthHandlers ready to authenticate, only 1 expected: {names:?}", names.len())]
    TooManyAuthHandlersReady {
        /// Names of the ready handlers.
        names: Vec<String>,
    },

    /// A parameter the signature version depends on is absent.
    #[error("Missing required query parameter: {0}")]
    MissingParameter(String),

    /// A capability tag did not match any known capability.
    #[error("Unknown capability: {0}")]
    UnknownCapability(String),

    /// The configuration source failed while credentials were being read.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Why a handler declined to authenticate a request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotReadyReason {
    /// The configuration holds no keys for the provider.
    #[error("no credentials available for provider {provider}")]
    CredentialsNotAvailable {
        /// Provider name the lookup was made for.
        provider: String,
    },

    /// The handler does not sign requests for this host.
    #[error("{handler} does not apply to host {host}")]
    HandlerNotApplicable {
        /// Handler that declined.
        handler: &'static str,
        /// Host of the request target.
        host: String,
    },
}
