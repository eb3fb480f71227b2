//! Log subscriber setup

use crate::config::Verbosity;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter for the given verbosity, unless `RUST_LOG` is set
#[must_use]
pub fn env_filter(verbosity: Verbosity) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(verbosity.log_directive()))
}

/// Install a stderr fmt subscriber; a second call is a no-op
pub fn init_logging(verbosity: Verbosity, use_color: bool) {
    let _ = tracing_subscriber::registry()
        .with(env_filter(verbosity))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(use_color)
                .with_target(false),
        )
        .try_init();
}
