//! Engine configuration parsing from YAML/JSON.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use super::schema::validate_config_schema;

/// Errors that can occur when loading an engine configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Config does not match schema: {}", .0.join("; "))]
    SchemaError(Vec<String>),

    #[error("Config validation failed: {0}")]
    ValidationError(String),

    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),
}

/// Closed interval of acceptable lesson dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    /// First acceptable date (inclusive)
    pub start: NaiveDate,

    /// Last acceptable date (inclusive)
    pub end: NaiveDate,
}

impl DateWindow {
    /// Create a window. Returns `None` if `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// Whether `date` falls inside the window, bounds included.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl Default for DateWindow {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or(NaiveDate::MIN),
            end: NaiveDate::from_ymd_opt(2025, 6, 15).unwrap_or(NaiveDate::MAX),
        }
    }
}

/// Tunable limits for the rule set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Acceptable lesson dates
    pub date_window: DateWindow,

    /// Lesson counts a complete journal may end on
    pub expected_lesson_totals: Vec<i64>,

    /// Maximum theme length in characters
    pub theme_max_chars: usize,

    /// Maximum homework length in characters
    pub homework_max_chars: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            date_window: DateWindow::default(),
            expected_lesson_totals: vec![35, 70, 105, 140],
            theme_max_chars: 100,
            homework_max_chars: 60,
        }
    }
}

impl EngineConfig {
    /// Parse a config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Self::from_value(serde_json::Value::Null);
        }
        let value: serde_json::Value = serde_yaml::from_str(yaml)?;
        Self::from_value(value)
    }

    /// Parse a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Parse a config from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Parse a config from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Parse a config file, picking the format from its extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "yaml" | "yml" => Self::from_yaml_file(path),
            "json" => Self::from_json_file(path),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Render the config as YAML.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    fn from_value(mut value: serde_json::Value) -> Result<Self, ConfigError> {
        // An empty YAML document means "all defaults"
        if value.is_null() {
            value = serde_json::Value::Object(serde_json::Map::new());
        }

        validate_config_schema(&value).map_err(ConfigError::SchemaError)?;

        let config: EngineConfig = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    /// Check semantic constraints the schema cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.date_window.start > self.date_window.end {
            return Err(ConfigError::ValidationError(format!(
                "date_window.start ({}) is after date_window.end ({})",
                self.date_window.start, self.date_window.end
            )));
        }

        if self.expected_lesson_totals.is_empty() {
            return Err(ConfigError::ValidationError(
                "expected_lesson_totals must not be empty".to_string(),
            ));
        }

        if let Some(total) = self.expected_lesson_totals.iter().find(|t| **t <= 0) {
            return Err(ConfigError::ValidationError(format!(
                "expected_lesson_totals must be positive, got {}",
                total
            )));
        }

        if self.theme_max_chars == 0 {
            return Err(ConfigError::ValidationError(
                "theme_max_chars must be greater than zero".to_string(),
            ));
        }

        if self.homework_max_chars == 0 {
            return Err(ConfigError::ValidationError(
                "homework_max_chars must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.date_window.start, date(2025, 1, 1));
        assert_eq!(config.date_window.end, date(2025, 6, 15));
        assert_eq!(config.expected_lesson_totals, vec![35, 70, 105, 140]);
        assert_eq!(config.theme_max_chars, 100);
        assert_eq!(config.homework_max_chars, 60);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_yaml_keeps_defaults() {
        let yaml = r#"
date_window:
  start: "2025-09-01"
  end: "2025-12-31"
"#;
        let config = EngineConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.date_window.start, date(2025, 9, 1));
        assert_eq!(config.date_window.end, date(2025, 12, 31));
        assert_eq!(config.theme_max_chars, 100);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config = EngineConfig::from_yaml("").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_parse_json() {
        let config = EngineConfig::from_json(r#"{"expected_lesson_totals": [34, 68]}"#).unwrap();
        assert_eq!(config.expected_lesson_totals, vec![34, 68]);
    }

    #[test]
    fn test_inverted_window_rejected() {
        let yaml = r#"
date_window:
  start: "2025-06-15"
  end: "2025-01-01"
"#;
        let result = EngineConfig::from_yaml(yaml);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_unknown_field_is_schema_error() {
        let result = EngineConfig::from_yaml("homework_limit: 10\n");
        assert!(matches!(result, Err(ConfigError::SchemaError(_))));
    }

    #[test]
    fn test_impossible_date_is_json_error() {
        // Matches the schema pattern but is not a calendar date
        let yaml = r#"
date_window:
  start: "2025-02-30"
  end: "2025-06-15"
"#;
        let result = EngineConfig::from_yaml(yaml);
        assert!(matches!(result, Err(ConfigError::JsonError(_))));
    }

    #[test]
    fn test_unsupported_extension() {
        let result = EngineConfig::from_file("limits.toml");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_yaml_roundtrip_of_default() {
        let yaml = EngineConfig::default().to_yaml().unwrap();
        let parsed = EngineConfig::from_yaml(&yaml).unwrap();
        assert_eq!(parsed, EngineConfig::default());
    }

    #[test]
    fn test_window_contains_bounds() {
        let window = DateWindow::default();
        assert!(window.contains(date(2025, 1, 1)));
        assert!(window.contains(date(2025, 6, 15)));
        assert!(!window.contains(date(2024, 12, 31)));
        assert!(!window.contains(date(2025, 6, 16)));
        assert!(DateWindow::new(date(2025, 2, 1), date(2025, 1, 1)).is_none());
    }
}
