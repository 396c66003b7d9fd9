//! TOML-based engine configuration.
//!
//! Stores tunables for:
//! - Focus timer length and tick rate
//! - Reminder polling, retention and display limit
//! - Search and upcoming-list limits
//! - Snapshot file name
//!
//! Configuration is stored at `~/.config/achievemore/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::data_dir;
use crate::error::ConfigError;

/// Focus timer configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_focus_minutes")]
    pub focus_minutes: u32,
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

/// Reminder sweep configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemindersConfig {
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    /// Fired reminders older than this are pruned.
    #[serde(default = "default_retention_hours")]
    pub retention_hours: u32,
    #[serde(default = "default_5")]
    pub display_limit: usize,
}

/// Task view configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TasksConfig {
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,
    #[serde(default = "default_5")]
    pub upcoming_limit: usize,
}

/// Snapshot location, relative to the data directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_file")]
    pub data_file: String,
}

/// Engine configuration.
///
/// Serialized to/from TOML at `~/.config/achievemore/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub reminders: RemindersConfig,
    #[serde(default)]
    pub tasks: TasksConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

// Default functions
fn default_focus_minutes() -> u32 {
    25
}
fn default_tick_interval_ms() -> u64 {
    1000
}
fn default_poll_interval_secs() -> u64 {
    60
}
fn default_retention_hours() -> u32 {
    24
}
fn default_search_limit() -> usize {
    10
}
fn default_5() -> usize {
    5
}
fn default_data_file() -> String {
    "achievemore.json".into()
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            focus_minutes: default_focus_minutes(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

impl Default for RemindersConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
            retention_hours: default_retention_hours(),
            display_limit: 5,
        }
    }
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            search_limit: default_search_limit(),
            upcoming_limit: 5,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("config.toml"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from the data directory, writing defaults if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated, or
    /// if the default config cannot be written.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Self = toml::from_str(&content)?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a zero focus length.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timer.focus_minutes == 0 {
            return Err(ConfigError::Invalid {
                field: "timer.focus_minutes",
                message: "must be at least one minute".into(),
            });
        }
        Ok(())
    }

    /// Persist to the data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Focus length in seconds, never shorter than one minute.
    pub fn focus_secs(&self) -> u32 {
        self.timer.focus_minutes.max(1).saturating_mul(60)
    }

    pub fn timer_tick_interval(&self) -> Duration {
        Duration::from_millis(self.timer.tick_interval_ms.max(1))
    }

    pub fn reminder_poll_interval(&self) -> Duration {
        Duration::from_secs(self.reminders.poll_interval_secs.max(1))
    }

    pub fn reminder_retention(&self) -> chrono::Duration {
        chrono::Duration::hours(i64::from(self.reminders.retention_hours))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn config_default_values() {
        let cfg = Config::default();
        assert_eq!(cfg.timer.focus_minutes, 25);
        assert_eq!(cfg.focus_secs(), 1500);
        assert_eq!(cfg.reminder_poll_interval(), Duration::from_secs(60));
        assert_eq!(cfg.reminder_retention(), chrono::Duration::hours(24));
        assert_eq!(cfg.reminders.display_limit, 5);
        assert_eq!(cfg.tasks.search_limit, 10);
        assert_eq!(cfg.storage.data_file, "achievemore.json");
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[timer]\nfocus_minutes = 50\n").unwrap();
        assert_eq!(parsed.timer.focus_minutes, 50);
        assert_eq!(parsed.timer.tick_interval_ms, 1000);
        assert_eq!(parsed.reminders.poll_interval_secs, 60);
    }

    #[test]
    fn load_from_writes_defaults_when_missing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn load_from_rejects_bad_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "timer = [").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::ParseFailed(_))
        ));
    }

    #[test]
    fn zero_focus_minutes_is_rejected_on_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[timer]\nfocus_minutes = 0\n").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::Invalid { field: "timer.focus_minutes", .. })
        ));
    }

    #[test]
    fn focus_secs_floors_at_one_minute() {
        let mut cfg = Config::default();
        cfg.timer.focus_minutes = 0;
        assert_eq!(cfg.focus_secs(), 60);
    }
}
