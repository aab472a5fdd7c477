use std::io;

use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "CODE_PAIR_CHECK_LOG";

/// Installs the stderr subscriber. Filter directives come from
/// `CODE_PAIR_CHECK_LOG`, falling back to `warn`.
pub(crate) fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    // A subscriber may already be installed when embedded; keep that one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}
