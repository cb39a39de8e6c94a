//! Process-wide tracing init. Called once by the (out-of-scope) CLI entry
//! point; the core never initializes a subscriber itself so library
//! consumers can install their own.

use tracing_subscriber::EnvFilter;

/// Install a subscriber reading `RUST_LOG` (default `info`), human-readable
/// to stderr. Safe to call more than once; subsequent calls are no-ops.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
