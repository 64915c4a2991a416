//! Logging bootstrap for the engine's test suites.
//!
//! Game-flow and session tests stay quiet by default so assertion output is
//! readable; rules-engine and session traces are opt-in per run via env vars
//! without touching test code.

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

/// Default filter: warnings everywhere, plus the engine's own session
/// lifecycle lines (started/terminated, applied actions come in at debug).
const DEFAULT_DIRECTIVE: &str = "warn,pidro_engine=info";

static INITIALIZED: OnceCell<()> = OnceCell::new();

/// Install the test subscriber once per process.
///
/// Idempotent and race-safe across unit and integration tests. The filter
/// directive is resolved in order:
///
/// 1. `TEST_LOG` (preferred, e.g. `TEST_LOG=pidro_engine::session=debug` to
///    watch a session serializer work through its inbox)
/// 2. `RUST_LOG`
/// 3. [`DEFAULT_DIRECTIVE`]
///
/// Output goes through the test writer so cargo and nextest capture it per
/// test, and timestamps are dropped so game logs diff cleanly between runs
/// of the same seed.
pub fn init() {
    INITIALIZED.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}
