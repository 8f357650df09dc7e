//! Subcommand implementations and the shared application context.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::debug;

use familia_core::config::{load_config_from, FamiliaConfig};
use familia_core::content::ContentLibrary;
use familia_core::settings::Settings;
use familia_core::stats::StatsTracker;
use familia_core::store::{FileStore, Store};

pub mod chat;
pub mod check;
pub mod content;
pub mod init;
pub mod quiz;
pub mod record;
pub mod stats;
pub mod theme;
pub mod transfer;

/// Everything a command needs, opened once per invocation.
pub struct App {
    pub config: FamiliaConfig,
    pub tracker: StatsTracker,
    pub library: ContentLibrary,
    pub settings: Settings,
}

impl App {
    /// Load config, open the data directory and start today's stats record.
    pub fn open(data_dir: Option<PathBuf>, config_path: Option<&Path>) -> Result<Self> {
        let mut config = load_config_from(config_path)?;
        if let Some(dir) = data_dir {
            config.data_dir = dir;
        }

        let backend = FileStore::open(config.data_dir.clone()).with_context(|| {
            format!("failed to open data directory: {}", config.data_dir.display())
        })?;
        debug!(data_dir = %config.data_dir.display(), "opened data directory");
        let store = Store::new(Arc::new(backend));

        let tracker = StatsTracker::with_system_clock(store.clone());
        tracker.ensure_today_initialized();

        Ok(Self {
            tracker,
            library: ContentLibrary::new(store.clone()),
            settings: Settings::new(store),
            config,
        })
    }
}
