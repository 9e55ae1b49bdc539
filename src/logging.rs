//! Diagnostic logging
//!
//! `tracing` events go to stderr and never mix with command output. The
//! filter comes from `SMCTL_LOG` (e.g. `SMCTL_LOG=smctl=trace`); without it
//! only warnings are shown, or smctl debug events under `--verbose`.

use std::io;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "SMCTL_LOG";

/// Installs the global subscriber; later calls are no-ops
pub fn init(verbose: bool) {
    let default_filter = if verbose { "smctl=debug,warn" } else { "warn" };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_filter));

    // Fails only when a subscriber is already installed
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .try_init();
}
