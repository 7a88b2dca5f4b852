//! Container engine integration tests
//!
//! These tests exercise the full register -> build -> resolve -> dispose
//! lifecycle through the public surfaces only.

mod builder_tests;
mod compile_tests;

/// Install a subscriber for tests that want engine logs; later calls are
/// no-ops.
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
