//! Tracing setup for native binaries.
//!
//! The filter comes from `RUST_LOG` (e.g. `RUST_LOG=kt_toggle=debug` to see
//! every transition and dispatch) and falls back to `info`.

#[cfg(test)]
#[path = "logging_test.rs"]
mod logging_test;

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info";

/// Build the filter for `directives`, falling back to [`DEFAULT_FILTER`]
/// when they are empty or do not parse.
#[must_use]
pub fn filter(directives: &str) -> EnvFilter {
    if directives.trim().is_empty() {
        return EnvFilter::new(DEFAULT_FILTER);
    }
    match EnvFilter::try_new(directives) {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new(DEFAULT_FILTER),
    }
}

/// Install the global fmt subscriber. Calling it again is harmless.
pub fn init() {
    let directives = std::env::var("RUST_LOG").unwrap_or_default();
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter(&directives))
        .with_target(true)
        .try_init();
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
