pub mod builders;
pub mod fake_backend;
pub mod memory_source;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Upper bound for any single await in the integration tests. Scheduler
/// tests sleep through a few one-second fires, so this stays well above that.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Route scheduler, executor and watcher logs into the test harness.
///
/// Runs once per test binary. Output shows up only for failing tests; set
/// `RUST_LOG=schedwatch=debug` to see reload and fire decisions.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let _ = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .try_init();
    });
}

/// Await `f`, failing the test if it takes longer than [`TEST_TIMEOUT`].
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: Future<Output = T>,
{
    tokio::time::timeout(TEST_TIMEOUT, f)
        .await
        .unwrap_or_else(|_| panic!("test step timed out after {TEST_TIMEOUT:?}"))
}
