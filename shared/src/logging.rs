use tracing_subscriber::EnvFilter;

use crate::config::{Config, DEFAULT_LOG_LEVEL};

/// Installs the global subscriber. `RUST_LOG` takes precedence over `LOG_LEVEL`;
/// production emits one JSON object per line without colors.
pub fn init(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    if config.is_production() {
        builder.json().with_ansi(false).init();
    } else {
        builder.init();
    }
}
