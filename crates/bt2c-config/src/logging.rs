//! Tracing setup, grounded on `node-runtime::main`'s subscriber
//! initialization but driven by `RUST_LOG`/the configured filter
//! string instead of a fixed `Level`.

use tracing_subscriber::EnvFilter;

/// Install a global `tracing` subscriber. `default_filter` is used
/// when `RUST_LOG` is unset; otherwise `RUST_LOG` wins, matching
/// `EnvFilter`'s usual precedence.
///
/// Returns an error if a global subscriber is already installed
/// (calling this twice in one process, which tests should avoid by
/// calling it at most once per binary).
pub fn init_tracing(default_filter: &str) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)
}
