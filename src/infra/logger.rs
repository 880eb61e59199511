// src/infra/logger.rs — tracing setup

use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber. RUST_LOG overrides everything; without
/// it the filter limits output to this crate at `default_level` so that
/// dependency noise stays out of the terminal.
pub fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("kotoba={default_level}")));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
