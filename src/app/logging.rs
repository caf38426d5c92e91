//! Logging configuration and initialization

use crate::app::config::AppConfig;
use tracing::{debug, trace};

/// Install the global fmt subscriber.
///
/// `-vv` adds event targets, `-vvv` adds thread ids and line numbers.
pub fn init_logging(config: &AppConfig) {
    let detailed = config.verbose >= 3;

    tracing_subscriber::fmt()
        .with_env_filter(config.log_level())
        .with_target(config.verbose >= 2)
        .with_thread_ids(detailed)
        .with_line_number(detailed)
        .init();

    debug!(verbose = config.verbose, "fixture-harness logging ready");
    trace!(args = ?std::env::args().collect::<Vec<_>>(), "command line");
}
