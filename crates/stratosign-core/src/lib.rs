//! Core types and configuration for stratosign.
//!
//! This crate provides the values the signing layer works on: the outgoing
//! [`HttpRequest`], the [`Provider`] descriptor that selects AWS or Google
//! Cloud Storage conventions, and the [`ConfigSource`] lookup credentials are
//! resolved from.

mod config;
mod error;
mod provider;
mod request;

pub use config::{CREDENTIALS_SECTION, ConfigSource, StaticConfig};
pub use error::{ConfigError, RequestError};
pub use provider::Provider;
pub use request::HttpRequest;
