//! Helpers shared by the `schedsim` integration tests.
//!
//! - [`builders`]: label-based graph construction and simulation setup.
//! - [`draws`]: scripted steal draws.

pub mod builders;
pub mod draws;

use std::sync::Once;

use tracing_subscriber::EnvFilter;

static TRACING: Once = Once::new();

/// Install a tracing subscriber for the current test binary.
///
/// Output goes through the test writer, so it only shows for failing tests
/// (or with `--nocapture`). `RUST_LOG` overrides the default `info` filter,
/// e.g. `RUST_LOG=schedsim::engine=debug`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        // Another harness may have installed one already; keep theirs.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init();
    });
}
