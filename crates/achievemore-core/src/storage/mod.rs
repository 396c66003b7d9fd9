mod config;
pub mod snapshot;
pub mod store;

pub use config::{Config, RemindersConfig, StorageConfig, TasksConfig, TimerConfig};
pub use snapshot::Snapshot;
pub use store::{JsonFileStore, MemoryStore, SnapshotStore};

use std::path::PathBuf;

use crate::error::PersistenceError;

/// Returns `~/.config/achievemore[-dev]/` based on ACHIEVEMORE_ENV.
///
/// Set ACHIEVEMORE_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the data directory fails.
pub fn data_dir() -> Result<PathBuf, PersistenceError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("ACHIEVEMORE_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("achievemore-dev")
    } else {
        base_dir.join("achievemore")
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| PersistenceError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
