//! Integration tests for the paygate client.
//!
//! These tests call a real gateway with real merchant credentials taken from
//! the `PAYGATE_*` environment variables. They are marked `#[ignore]` so they
//! don't run during normal `cargo test`.
//!
//! Run them with:
//! ```text
//! cargo test -p paygate-integration -- --ignored
//! ```

use std::sync::Once;

use paygate_client::GatewayClient;
use paygate_core::GatewayConfig;

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Base URL of the gateway API.
#[must_use]
pub fn base_url() -> String {
    std::env::var("PAYGATE_BASE_URL")
        .unwrap_or_else(|_| "https://api.mch.weixin.qq.com".to_owned())
}

/// Full URL of an API path.
#[must_use]
pub fn endpoint(path: &str) -> String {
    format!("{}{path}", base_url().trim_end_matches('/'))
}

/// Configuration loaded from the environment.
#[must_use]
pub fn config() -> GatewayConfig {
    GatewayConfig::from_env()
}

/// Create a client from the environment configuration.
#[must_use]
pub fn gateway_client() -> GatewayClient {
    init_tracing();
    GatewayClient::from_config(&config())
        .unwrap_or_else(|e| panic!("failed to build gateway client: {e}"))
}

/// Generate a merchant trade number that the gateway has never seen.
#[must_use]
pub fn unique_trade_no(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().simple().to_string()[..16].to_owned();
    format!("{prefix}{id}")
}

mod test_errors;
mod test_queries;
