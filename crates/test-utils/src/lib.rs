//! Shared helpers for the pollwatch integration tests.

pub mod builders;
pub mod fake_runner;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::{fmt, EnvFilter};

static TRACING: Once = Once::new();

/// Upper bound for any single watch-loop test.
pub const TEST_DEADLINE: Duration = Duration::from_secs(5);

/// Route `tracing` output of the crate under test into the test harness.
///
/// Output is captured per test and shown for failures only. `RUST_LOG`
/// overrides the default `info` filter, e.g. `RUST_LOG=pollwatch=trace`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        fmt().with_env_filter(filter).with_test_writer().init();
    });
}

/// Await `fut`, failing the test if the loop has not returned within
/// [`TEST_DEADLINE`].
pub async fn with_timeout<F, T>(fut: F) -> T
where
    F: Future<Output = T>,
{
    match tokio::time::timeout(TEST_DEADLINE, fut).await {
        Ok(value) => value,
        Err(_) => panic!("watch loop did not return within {TEST_DEADLINE:?}"),
    }
}
