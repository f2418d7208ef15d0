//! Gateway client for a certificate-secured payment API.
//!
//! [`GatewayClient::execute`] signs caller parameters according to the
//! request kind, posts them over a mutually authenticated TLS connection,
//! decodes the flat XML answer, and checks its signature.
//!
//! The network leg sits behind the [`Transport`] trait; [`HttpTransport`]
//! is the reqwest implementation used by [`GatewayClient::from_config`].

mod body;
mod client;
mod response;
mod transport;

pub use body::{WireBody, encode_body};
pub use client::GatewayClient;
pub use response::{GatewayResponse, verify_response};
pub use transport::{HttpTransport, Transport};
