//! Testing utilities for Gatehouse
//!
//! Scripted stand-ins for the collaborators an OAuth strategy talks to, plus
//! a request builder:
//!
//! - [`MockClientFactory`] records every [`ClientConfig`](gatehouse_oauth::ClientConfig)
//!   and answers code exchanges from a script.
//! - [`MockLoader`] maps access tokens to users.
//! - [`TestRequest`] builds a [`RequestInfo`](gatehouse_core::RequestInfo) from a URL.

pub mod client;
pub mod loader;
pub mod request;

pub use client::{MockClientFactory, MockExchange, MockOAuthClient, DEFAULT_AUTHORIZE_URL};
pub use loader::{MockLoad, MockLoader};
pub use request::TestRequest;

use std::sync::Once;
use tracing_subscriber::EnvFilter;

static TRACING: Once = Once::new();

/// Install a fmt subscriber writing through the test harness.
///
/// Honors `RUST_LOG`; defaults to `gatehouse=debug`. Safe to call from every test.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("warn,gatehouse=debug")),
            )
            .with_test_writer()
            .try_init();
    });
}
