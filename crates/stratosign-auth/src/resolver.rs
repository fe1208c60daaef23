//! Handler arbitration.
//!
//! Every registered candidate that provides the requested capabilities is
//! instantiated for the target host. Exactly one of them must be ready: when
//! two handlers are willing to sign, there is no guarantee they refer to the
//! same account, so resolution fails instead of picking one.

use stratosign_core::{ConfigSource, Provider};
use tracing::debug;

use crate::error::AuthError;
use crate::handler::{AuthHandler, Capability, HandlerFactory, Readiness};
use crate::hmac_auth::HmacAuthHandler;
use crate::query::{QuerySignatureV0Handler, QuerySignatureV1Handler, QuerySignatureV2Handler};

/// The built-in handlers, in registration order.
#[must_use]
pub fn default_handlers() -> Vec<HandlerFactory> {
    vec![
        HmacAuthHandler::factory(),
        QuerySignatureV0Handler::factory(),
        QuerySignatureV1Handler::factory(),
        QuerySignatureV2Handler::factory(),
    ]
}

/// Find the single handler ready to authenticate requests to `host`.
///
/// # Errors
///
/// Returns [`AuthError::NoAuthHandlerFound`] when no candidate is ready,
/// [`AuthError::TooManyAuthHandlersReady`] when more than one is, and
/// [`AuthError::Config`] when the configuration source fails.
///
/// # Examples
///
/// ```
/// use stratosign_auth::{Capability, default_handlers, resolve_handler};
/// use stratosign_core::{Provider, StaticConfig};
///
/// let config = StaticConfig::new()
///     .with_option("Credentials", "aws_access_key_id", "AKID")
///     .with_option("Credentials", "aws_secret_access_key", "secret");
///
/// let handler = resolve_handler(
///     "ec2.amazonaws.com",
///     &config,
///     &Provider::aws(),
///     &[Capability::SignV2],
///     &default_handlers(),
/// )
/// .unwrap();
/// assert_eq!(handler.name(), "QuerySignatureV2AuthHandler");
/// ```
pub fn resolve_handler(
    host: &str,
    config: &dyn ConfigSource,
    provider: &Provider,
    requested: &[Capability],
    candidates: &[HandlerFactory],
) -> Result<Box<dyn AuthHandler>, AuthError> {
    let checked: Vec<&HandlerFactory> = candidates
        .iter()
        .filter(|factory| factory.is_capable(requested))
        .collect();

    let mut ready = Vec::new();
    for factory in &checked {
        match factory.instantiate(host, config, provider)? {
            Readiness::Ready(handler) => ready.push(handler),
            Readiness::NotReady(reason) => {
                debug!(handler = factory.name, %reason, "Handler not ready to authenticate");
            }
        }
    }

    match ready.len() {
        0 => Err(AuthError::NoAuthHandlerFound {
            checked: checked.len(),
            names: checked.iter().map(|f| f.name.to_owned()).collect(),
        }),
        1 => {
            let handler = ready.remove(0);
            debug!(handler = handler.name(), host, "Resolved auth handler");
            Ok(handler)
        }
        _ => Err(AuthError::TooManyAuthHandlersReady {
            names: ready.iter().map(|h| h.name().to_owned()).collect(),
        }),
    }
}
