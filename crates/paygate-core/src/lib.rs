//! Core types, configuration, and errors for paygate.
//!
//! This crate provides the building blocks shared by the signing, XML, and
//! client crates: the env-driven [`GatewayConfig`], the immutable
//! [`Credentials`] record built from it, and the [`GatewayError`] type whose
//! [`ErrorKind`] lets callers branch on the failure category.

mod config;
mod credentials;
mod error;

pub use config::{GatewayConfig, MissingSignPolicy, RequestEncoding};
pub use credentials::Credentials;
pub use error::{BoxError, ErrorKind, GatewayError, GatewayResult};
