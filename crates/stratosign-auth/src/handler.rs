//! The signing-strategy interface shared by every authentication handler.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use stratosign_core::{ConfigSource, HttpRequest, Provider};

use crate::error::{AuthError, NotReadyReason};

/// Signing capability advertised by a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// `Authorization` header signed with HMAC-SHA1 (storage services).
    SignHeader,
    /// Query signature version 0.
    SignV0,
    /// Query signature version 1.
    SignV1,
    /// Query signature version 2.
    SignV2,
}

impl Capability {
    /// Tag of the capability (`sign-header`, `sign-v0`, ...).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SignHeader => "sign-header",
            Self::SignV0 => "sign-v0",
            Self::SignV1 => "sign-v1",
            Self::SignV2 => "sign-v2",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Capability {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sign-header" => Ok(Self::SignHeader),
            "sign-v0" => Ok(Self::SignV0),
            "sign-v1" => Ok(Self::SignV1),
            "sign-v2" => Ok(Self::SignV2),
            other => Err(AuthError::UnknownCapability(other.to_owned())),
        }
    }
}

/// A strategy that signs requests in place.
///
/// Handlers are immutable once constructed; signing takes `&self` and every
/// call works on its own copy of the hash state.
pub trait AuthHandler: fmt::Debug + Send + Sync {
    /// Name used in resolution diagnostics.
    fn name(&self) -> &'static str;

    /// Sign `request` as of `now`.
    fn add_auth_at(&self, request: &mut HttpRequest, now: DateTime<Utc>) -> Result<(), AuthError>;

    /// Sign `request` using the current wall-clock time.
    fn add_auth(&self, request: &mut HttpRequest) -> Result<(), AuthError> {
        self.add_auth_at(request, Utc::now())
    }
}

/// Outcome of instantiating a handler for a request target.
#[derive(Debug)]
pub enum Readiness<H = Box<dyn AuthHandler>> {
    /// The handler can sign for the target.
    Ready(H),
    /// The handler declined.
    NotReady(NotReadyReason),
}

impl<H: AuthHandler + 'static> Readiness<H> {
    /// Erase the concrete handler type.
    #[must_use]
    pub fn boxed(self) -> Readiness {
        match self {
            Self::Ready(handler) => Readiness::Ready(Box::new(handler)),
            Self::NotReady(reason) => Readiness::NotReady(reason),
        }
    }
}

impl<H> Readiness<H> {
    /// Whether the handler is ready.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// Transform the ready handler, keeping the not-ready reason as-is.
    pub fn map<T>(self, f: impl FnOnce(H) -> T) -> Readiness<T> {
        match self {
            Self::Ready(handler) => Readiness::Ready(f(handler)),
            Self::NotReady(reason) => Readiness::NotReady(reason),
        }
    }
}

/// Constructor signature shared by all handlers.
///
/// Readiness checks happen inside the constructor. Configuration failures are
/// returned as errors and abort resolution.
pub type HandlerConstructor =
    fn(&str, &dyn ConfigSource, &Provider) -> Result<Readiness, AuthError>;

/// A registered handler candidate.
#[derive(Debug, Clone, Copy)]
pub struct HandlerFactory {
    /// Handler name, reported in resolution errors.
    pub name: &'static str,
    /// Capabilities the handler provides.
    pub capabilities: &'static [Capability],
    /// Constructor performing the readiness checks.
    pub build: HandlerConstructor,
}

impl HandlerFactory {
    /// Whether the handler provides every capability in `requested`.
    ///
    /// An empty request matches every handler.
    #[must_use]
    pub fn is_capable(&self, requested: &[Capability]) -> bool {
        requested.iter().all(|c| self.capabilities.contains(c))
    }

    /// Instantiate the handler for `host`.
    pub fn instantiate(
        &self,
        host: &str,
        config: &dyn ConfigSource,
        provider: &Provider,
    ) -> Result<Readiness, AuthError> {
        (self.build)(host, config, provider)
    }
}
