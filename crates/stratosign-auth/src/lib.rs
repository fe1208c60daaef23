//! Request signing for AWS and Google Cloud Storage APIs.
//!
//! This crate signs outgoing requests with one of four HMAC-based schemes and
//! picks the scheme through a small arbitration protocol: every registered
//! handler is instantiated for the request target, and exactly one of them
//! must report that it is ready.
//!
//! # Overview
//!
//! - [`HmacAuthHandler`] signs an `Authorization` header (S3 and Google Cloud
//!   Storage).
//! - [`QuerySignatureV0Handler`], [`QuerySignatureV1Handler`] and
//!   [`QuerySignatureV2Handler`] sign the query string of the AWS query APIs.
//!
//! # Usage
//!
//! ```rust
//! use stratosign_auth::{AuthHandler, Capability, default_handlers, resolve_handler};
//! use stratosign_core::{HttpRequest, Provider, StaticConfig};
//!
//! let config = StaticConfig::new()
//!     .with_option("Credentials", "aws_access_key_id", "AKIDEXAMPLE")
//!     .with_option("Credentials", "aws_secret_access_key", "wJalrXUtnFEMI/K7MDENG/bPxRfiCYEXAMPLEKEY");
//!
//! let handler = resolve_handler(
//!     "sdb.amazonaws.com",
//!     &config,
//!     &Provider::aws(),
//!     &[Capability::SignV2],
//!     &default_handlers(),
//! )
//! .unwrap();
//!
//! let mut request = HttpRequest::builder()
//!     .method("GET")
//!     .host("sdb.amazonaws.com")
//!     .path("/")
//!     .build()
//!     .with_param("Action", "ListDomains");
//!
//! handler.add_auth(&mut request).unwrap();
//! assert!(request.path.contains("&Signature="));
//! assert!(request.params.is_empty());
//! ```
//!
//! # Modules
//!
//! - [`canonical`] - Canonical strings and query-string escaping
//! - [`credentials`] - Credential resolution from configuration
//! - [`error`] - Authentication error types
//! - [`handler`] - The handler trait, readiness, and registration entries
//! - [`hmac_auth`] - `Authorization` header signing
//! - [`keys`] - Keyed-hash contexts
//! - [`query`] - Query signature versions 0, 1 and 2
//! - [`resolver`] - Handler arbitration

pub mod canonical;
pub mod credentials;
pub mod error;
pub mod handler;
pub mod hmac_auth;
pub mod keys;
pub mod query;
pub mod resolver;

pub use credentials::{Credentials, resolve_credentials};
pub use error::{AuthError, NotReadyReason};
pub use handler::{AuthHandler, Capability, HandlerConstructor, HandlerFactory, Readiness};
pub use hmac_auth::HmacAuthHandler;
pub use keys::HmacKeys;
pub use query::{QuerySignatureV0Handler, QuerySignatureV1Handler, QuerySignatureV2Handler};
pub use resolver::{default_handlers, resolve_handler};
