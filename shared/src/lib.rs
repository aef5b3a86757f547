pub mod config;
pub mod logging;

use std::path::PathBuf;
use std::time::Instant;

use rollcall_atoms::users::{UserMirror, UserStore};

pub use config::{Config, ConfigError};

/// Everything a request handler needs, shared across requests behind an `Arc`.
#[derive(Debug)]
pub struct AppState {
    pub store: UserStore,
    pub mirror: UserMirror,
    pub static_dir: PathBuf,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        tracing::info!("Mirroring users to {}", config.data_dir.display());
        Self {
            store: UserStore::new(),
            mirror: UserMirror::new(&config.data_dir),
            static_dir: config.static_dir.clone(),
            started_at: Instant::now(),
        }
    }
}
