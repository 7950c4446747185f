// Copyright 2026 Oxide Computer Company

//! Diagnostic logging.

use tracing_subscriber::EnvFilter;

/// The environment variable holding the log filter (`tracing` directives,
/// e.g. `debug` or `deploy_marker_resource=trace`).
pub const LOG_ENV: &str = "DEPLOY_MARKER_LOG";

/// Installs a stderr logger filtered by [`LOG_ENV`], defaulting to `warn`.
///
/// Stdout is left alone: Concourse reads the step's result from it.
pub fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    // A second call (or a logger installed by an embedding program) keeps
    // the existing subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .try_init();
}
