//! Test-only tracing setup
//!
//! Integration tests call [`init_test_setup`] first so that dispatcher and
//! dump controller logs show up in failing test output (`cargo test -- --nocapture`).

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static TEST_SETUP: Once = Once::new();

/// Crate-level debug output unless `RUST_LOG` says otherwise.
const DEFAULT_TEST_FILTER: &str = "wdtk_client=debug";

/// Install a test-writer subscriber, once per test binary.
///
/// A subscriber installed elsewhere first wins; that is not an error.
pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_TEST_FILTER));

        let installed = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_test_writer()
                    .without_time()
                    .with_target(true)
                    .with_filter(filter),
            )
            .try_init();

        if installed.is_ok() {
            tracing::debug!("test subscriber installed");
        }
    });
}
