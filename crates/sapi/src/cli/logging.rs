//! Diagnostic logging for the `sapi` binary.

use std::io::{self, IsTerminal};

use tracing_subscriber::{EnvFilter, fmt};

/// Environment variable holding the log filter, e.g. `SAPI_LOG=debug`.
pub const LOG_ENV: &str = "SAPI_LOG";

/// Filter used when `SAPI_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "warn";

/// Installs the global subscriber, writing to stderr.
///
/// Must be called once, before any command runs.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .init();
}
