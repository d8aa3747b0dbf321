//! Configuration management for bmitrack.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use bmitrack_passgen::clipboard::MAX_HOLD;
use bmitrack_passgen::{PasswordRequest, MAX_LENGTH};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "bmitrack";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "bmi_data.db";

/// Default feedback file name.
const FEEDBACK_FILE_NAME: &str = "feedback.txt";

/// Smallest chart that still leaves room for axes and labels.
const MIN_CHART_WIDTH: u16 = 20;
const MIN_CHART_HEIGHT: u16 = 8;

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `BMITRACK_`, `__` between sections)
/// 2. TOML config file at `~/.config/bmitrack/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Feedback configuration.
    pub feedback: FeedbackConfig,
    /// Trend chart configuration.
    pub chart: ChartConfig,
    /// Password generator defaults.
    pub password: PasswordConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/bmitrack/bmi_data.db`
    pub database_path: Option<PathBuf>,
}

/// Feedback-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    /// Path to the feedback file.
    /// Defaults to `~/.local/share/bmitrack/feedback.txt`
    pub path: Option<PathBuf>,
}

/// Trend chart configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Chart width in terminal columns.
    pub width: u16,
    /// Chart height in terminal rows.
    pub height: u16,
}

/// Defaults for the password generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswordConfig {
    /// Password length.
    pub length: usize,
    /// Include ASCII letters.
    pub letters: bool,
    /// Include digits.
    pub numbers: bool,
    /// Include punctuation.
    pub symbols: bool,
    /// Longest time `password --copy` keeps serving the clipboard on
    /// platforms where the clipboard owner must stay alive (at most 3600).
    pub clipboard_hold_secs: u64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 80,
            height: 20,
        }
    }
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            length: bmitrack_passgen::DEFAULT_LENGTH,
            letters: true,
            numbers: true,
            symbols: true,
            clipboard_hold_secs: 10,
        }
    }
}

impl PasswordConfig {
    /// Build a request from these defaults.
    #[must_use]
    pub fn to_request(&self) -> PasswordRequest {
        PasswordRequest::new(self.length).with_classes(self.letters, self.numbers, self.symbols)
    }

    /// How long the system clipboard sink may keep serving a copied password.
    #[must_use]
    pub fn clipboard_hold(&self) -> Duration {
        Duration::from_secs(self.clipboard_hold_secs)
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("BMITRACK_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.chart.width < MIN_CHART_WIDTH || self.chart.height < MIN_CHART_HEIGHT {
            return Err(Error::ConfigValidation {
                message: format!(
                    "chart size {}x{} is below the minimum {MIN_CHART_WIDTH}x{MIN_CHART_HEIGHT}",
                    self.chart.width, self.chart.height
                ),
            });
        }

        if !(1..=MAX_LENGTH).contains(&self.password.length) {
            return Err(Error::ConfigValidation {
                message: format!("password length must be between 1 and {MAX_LENGTH}"),
            });
        }

        if self.password.clipboard_hold() > MAX_HOLD {
            return Err(Error::ConfigValidation {
                message: format!(
                    "password clipboard hold must be at most {}s",
                    MAX_HOLD.as_secs()
                ),
            });
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the feedback file path, resolving defaults if not set.
    #[must_use]
    pub fn feedback_path(&self) -> PathBuf {
        self.feedback
            .path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(FEEDBACK_FILE_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.storage.database_path.is_none());
        assert!(config.feedback.path.is_none());
        assert_eq!(config.chart.width, 80);
        assert_eq!(config.chart.height, 20);
        assert_eq!(config.password.length, 12);
        assert!(config.password.letters);
        assert!(config.password.numbers);
        assert!(config.password.symbols);
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_small_chart() {
        let mut config = Config::default();
        config.chart.width = 10;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("chart size"));

        let mut config = Config::default();
        config.chart.height = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_password_length() {
        let mut config = Config::default();
        config.password.length = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("password length"));
    }

    #[test]
    fn test_validate_oversized_password_length() {
        let mut config = Config::default();
        config.password.length = MAX_LENGTH + 1;
        assert!(config.validate().is_err());

        config.password.length = MAX_LENGTH;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_clipboard_hold() {
        let mut config = Config::default();
        config.password.clipboard_hold_secs = 3601;
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("clipboard hold"));

        config.password.clipboard_hold_secs = 0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_database_path_default() {
        let path = Config::default().database_path();
        assert!(path.to_string_lossy().contains("bmi_data.db"));
        assert!(path.to_string_lossy().contains("bmitrack"));
    }

    #[test]
    fn test_database_path_custom() {
        let mut config = Config::default();
        config.storage.database_path = Some(PathBuf::from("/custom/path/db.sqlite"));

        assert_eq!(
            config.database_path(),
            PathBuf::from("/custom/path/db.sqlite")
        );
    }

    #[test]
    fn test_feedback_path_default() {
        let path = Config::default().feedback_path();
        assert!(path.to_string_lossy().ends_with("feedback.txt"));
    }

    #[test]
    fn test_password_config_to_request() {
        let config = PasswordConfig {
            length: 20,
            letters: true,
            numbers: false,
            symbols: false,
            ..PasswordConfig::default()
        };
        let request = config.to_request();
        assert_eq!(request.length, 20);
        assert!(request.use_letters);
        assert!(!request.use_numbers);
        assert!(!request.use_symbols);
        assert!(request.exclude.is_empty());
        assert_eq!(config.clipboard_hold(), Duration::from_secs(10));
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("bmitrack"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        let result = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml")));
        assert_eq!(result.unwrap(), Config::default());
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[storage]
database_path = "/tmp/custom.db"

[chart]
width = 100

[password]
length = 24
symbols = false
"#,
        )
        .unwrap();

        let config = Config::load_from(Some(path)).unwrap();
        assert_eq!(config.database_path(), PathBuf::from("/tmp/custom.db"));
        assert_eq!(config.chart.width, 100);
        assert_eq!(config.chart.height, 20);
        assert_eq!(config.password.length, 24);
        assert!(!config.password.symbols);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[password]\nlength = 0\n").unwrap();

        let err = Config::load_from(Some(path)).unwrap_err();
        assert!(matches!(err, Error::ConfigValidation { .. }));
    }

    #[test]
    fn test_load_rejects_malformed_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[chart\nwidth = ").unwrap();

        let err = Config::load_from(Some(path)).unwrap_err();
        assert!(matches!(err, Error::ConfigLoad(_)));
    }

    #[test]
    fn test_config_serialize() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(json.contains("database_path"));
        assert!(json.contains("\"width\":80"));
    }

    #[test]
    fn test_chart_config_deserialize() {
        let json = r#"{"width": 120}"#;
        let chart: ChartConfig = serde_json::from_str(json).unwrap();
        assert_eq!(chart.width, 120);
        assert_eq!(chart.height, 20);
    }
}
