//! depx Configuration Management
//!
//! Handles configuration from environment variables and TOML files
//! with sensible defaults for local use.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Triple extraction settings
    pub extraction: ExtractionConfig,

    /// Input loading settings
    pub input: InputConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(label) = std::env::var("DEPX_UNKNOWN_RELATION") {
            if label.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "DEPX_UNKNOWN_RELATION".to_string(),
                    value: label,
                });
            }
            config.extraction.unknown_relation = label;
        }

        if let Ok(format) = std::env::var("DEPX_INPUT_FORMAT") {
            config.input.format = Some(validate_format("DEPX_INPUT_FORMAT", &format)?);
        }

        // Logging
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Ok(json) = std::env::var("LOG_JSON") {
            config.logging.json_format = json.parse().map_err(|_| ConfigError::InvalidValue {
                key: "LOG_JSON".to_string(),
                value: json,
            })?;
        }

        Ok(config)
    }

    /// Load from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        let mut config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path,
            message: e.to_string(),
        })?;

        if let Some(format) = config.input.format.take() {
            config.input.format = Some(validate_format("input.format", &format)?);
        }

        Ok(config)
    }

    /// Merge with environment variables (env takes precedence)
    pub fn with_env_override(mut self) -> Result<Self, ConfigError> {
        let env_config = Self::from_env()?;

        // Only override if env values differ from defaults
        if env_config.extraction.unknown_relation != ExtractionConfig::default().unknown_relation {
            self.extraction.unknown_relation = env_config.extraction.unknown_relation;
        }
        if env_config.input.format.is_some() {
            self.input.format = env_config.input.format;
        }
        if env_config.logging.level != LoggingConfig::default().level {
            self.logging.level = env_config.logging.level;
        }
        if env_config.logging.json_format {
            self.logging.json_format = true;
        }

        Ok(self)
    }
}

fn validate_format(key: &str, value: &str) -> Result<String, ConfigError> {
    let normalized = value.trim().to_lowercase();
    match normalized.as_str() {
        "json" | "conllu" => Ok(normalized),
        "conll" => Ok("conllu".to_string()),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

/// Triple extraction configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Relation text shown when a sentence has no relation match
    pub unknown_relation: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            unknown_relation: "unknown relation".to_string(),
        }
    }
}

/// Input loading configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct InputConfig {
    /// Force an input format (`json`, `conllu` or `conll`) instead of detecting it
    /// from the file extension
    pub format: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// JSON format for logs
    pub json_format: bool,

    /// Include file/line in logs
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json_format: false,
            include_location: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.extraction.unknown_relation, "unknown relation");
        assert_eq!(config.logging.level, "warn");
        assert!(config.input.format.is_none());
    }

    #[test]
    fn test_validate_format() {
        assert_eq!(validate_format("k", "JSON").unwrap(), "json");
        assert_eq!(validate_format("k", "conllu").unwrap(), "conllu");
        assert_eq!(validate_format("k", "conll").unwrap(), "conllu");
        assert!(validate_format("k", "xml").is_err());
    }

    const ENV_KEYS: [&str; 4] = [
        "DEPX_UNKNOWN_RELATION",
        "DEPX_INPUT_FORMAT",
        "LOG_LEVEL",
        "LOG_JSON",
    ];

    fn clear_env() {
        for key in ENV_KEYS {
            std::env::remove_var(key);
        }
    }

    // All environment cases live in one test so they never race each other.
    #[test]
    fn test_env_values() {
        clear_env();

        std::env::set_var("DEPX_UNKNOWN_RELATION", "  ");
        let err = AppConfig::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "DEPX_UNKNOWN_RELATION"));
        clear_env();

        std::env::set_var("LOG_JSON", "yes");
        let err = AppConfig::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "LOG_JSON"));
        clear_env();

        std::env::set_var("DEPX_INPUT_FORMAT", "xml");
        let err = AppConfig::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "DEPX_INPUT_FORMAT"));
        std::env::set_var("DEPX_INPUT_FORMAT", "CoNLL");
        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.input.format.as_deref(), Some("conllu"));
        clear_env();

        // Environment wins over file values; unset keys keep the file's
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[extraction]\nunknown_relation = \"n/a\"\n\n[input]\nformat = \"json\"\n\n[logging]\nlevel = \"debug\""
        )
        .unwrap();

        std::env::set_var("DEPX_UNKNOWN_RELATION", "no relation");
        std::env::set_var("DEPX_INPUT_FORMAT", "conllu");
        std::env::set_var("LOG_JSON", "true");
        let config = AppConfig::from_file(file.path())
            .unwrap()
            .with_env_override()
            .unwrap();
        clear_env();

        assert_eq!(config.extraction.unknown_relation, "no relation");
        assert_eq!(config.input.format.as_deref(), Some("conllu"));
        assert!(config.logging.json_format);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_from_file_partial_toml() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[extraction]\nunknown_relation = \"n/a\"\n").unwrap();
        writeln!(file, "[input]\nformat = \"conllu\"").unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();

        assert_eq!(config.extraction.unknown_relation, "n/a");
        assert_eq!(config.input.format.as_deref(), Some("conllu"));
        // Sections not present in the file keep their defaults
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_from_file_rejects_unknown_format() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[input]\nformat = \"xml\"").unwrap();

        let err = AppConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_from_file_missing() {
        let err = AppConfig::from_file("/nonexistent/depx.toml").unwrap_err();
        assert!(matches!(err, ConfigError::FileReadError { .. }));
    }
}
