//! Configuration for Glow.

use chrono::Datelike;
use glow_data::MonthKey;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML error: {0}")]
    Toml(#[from] toml::ser::Error),
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Remote sync settings.
    #[serde(default)]
    pub sync: SyncConfig,
    /// Calendar window settings.
    #[serde(default)]
    pub calendar: CalendarConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sync: SyncConfig::default(),
            calendar: CalendarConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default path. A missing or malformed
    /// file falls back to defaults.
    pub fn load() -> Self {
        Self::config_path()
            .and_then(|p| std::fs::read_to_string(p).ok())
            .and_then(|s| toml::from_str(&s).ok())
            .unwrap_or_default()
    }

    /// Save configuration to the default path.
    pub fn save(&self) -> Result<(), ConfigError> {
        if let Some(path) = Self::config_path() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let content = toml::to_string_pretty(self)?;
            std::fs::write(path, content)?;
        }
        Ok(())
    }

    /// Configuration file path.
    pub fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "glow")
            .map(|d| d.config_dir().join("config.toml"))
    }
}

/// Remote sync settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Base URL of the record service.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// How many years before the current one to pull at startup.
    #[serde(default = "default_years_back")]
    pub load_years_back: u32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            load_years_back: default_years_back(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_years_back() -> u32 {
    1
}

/// Calendar window settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// Year of the navigation origin.
    #[serde(default = "default_origin_year")]
    pub origin_year: i32,
    /// Month of the navigation origin, 1 through 12.
    #[serde(default = "default_origin_month")]
    pub origin_month: u32,
    /// Months created eagerly at startup.
    #[serde(default = "default_preload_months")]
    pub preload_months: u32,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            origin_year: default_origin_year(),
            origin_month: default_origin_month(),
            preload_months: default_preload_months(),
        }
    }
}

impl CalendarConfig {
    /// Origin as a month key. An out-of-range month in the file falls
    /// back to January.
    pub fn origin(&self) -> MonthKey {
        if (1..=12).contains(&self.origin_month) {
            MonthKey::new(self.origin_year, self.origin_month)
        } else {
            MonthKey::new(self.origin_year, 1)
        }
    }
}

fn default_origin_year() -> i32 {
    chrono::Utc::now().year()
}

fn default_origin_month() -> u32 {
    1
}

fn default_preload_months() -> u32 {
    24
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.sync.base_url, "http://localhost:8000");
        assert_eq!(config.sync.timeout_secs, 10);
        assert_eq!(config.sync.load_years_back, 1);
        assert_eq!(config.calendar.origin_month, 1);
        assert_eq!(config.calendar.preload_months, 24);
        assert_eq!(config.calendar.origin().month, 1);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [sync]
            base_url = "https://glow.example.com"
            "#,
        )
        .unwrap();
        assert_eq!(config.sync.base_url, "https://glow.example.com");
        assert_eq!(config.sync.timeout_secs, 10);
        assert_eq!(config.calendar.preload_months, 24);
    }

    #[test]
    fn test_round_trip() {
        let mut config = Config::default();
        config.sync.base_url = "https://glow.example.com".to_string();
        config.calendar.origin_year = 2025;
        config.calendar.preload_months = 36;

        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.sync.base_url, config.sync.base_url);
        assert_eq!(parsed.calendar.origin_year, 2025);
        assert_eq!(parsed.calendar.preload_months, 36);
    }

    #[test]
    fn test_origin_falls_back_on_bad_month() {
        let calendar = CalendarConfig {
            origin_year: 2025,
            origin_month: 14,
            preload_months: 24,
        };
        assert_eq!(calendar.origin(), MonthKey::new(2025, 1));
    }
}
