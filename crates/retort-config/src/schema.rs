//! Configuration schema types.
//!
//! This module defines the structure of all configuration sections.

use retort_core::{BuildOptions, DEFAULT_MAX_DEPTH};
use retort_telemetry::{LogConfig, LogFormat};
use serde::{Deserialize, Serialize};

/// Validation configuration section.
///
/// Controls how request objects are built.
///
/// # Example
///
/// ```
/// use retort_config::ValidationConfig;
/// use retort_core::BuildOptions;
///
/// let config = ValidationConfig {
///     enforce_upper_bounds: true,
///     max_depth: 8,
/// };
///
/// let options = BuildOptions::from(&config);
/// assert!(options.enforce_upper_bounds);
/// assert_eq!(options.max_depth, 8);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ValidationConfig {
    /// Also enforce `max`, `max_length` and `pattern` declarations.
    #[serde(default)]
    pub enforce_upper_bounds: bool,

    /// Maximum nesting depth of request objects.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            enforce_upper_bounds: false,
            max_depth: default_max_depth(),
        }
    }
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

impl From<&ValidationConfig> for BuildOptions {
    fn from(config: &ValidationConfig) -> Self {
        Self {
            enforce_upper_bounds: config.enforce_upper_bounds,
            max_depth: config.max_depth,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Enable logging.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level or filter directive (e.g. "info", "retort_core=debug").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Include ANSI color codes in output.
    #[serde(default)]
    pub ansi_enabled: bool,

    /// Include source file and line in logs.
    #[serde(default)]
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
            ansi_enabled: false,
            include_location: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Telemetry configuration section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TelemetryConfigSection {
    /// Service name reported in logs.
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Deployment environment (e.g., "development", "production").
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for TelemetryConfigSection {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            environment: default_environment(),
            logging: LoggingConfig::default(),
        }
    }
}

fn default_service_name() -> String {
    "retort".to_string()
}

fn default_environment() -> String {
    "development".to_string()
}

impl From<&TelemetryConfigSection> for LogConfig {
    fn from(config: &TelemetryConfigSection) -> Self {
        Self {
            enabled: config.logging.enabled,
            level: config.logging.level.clone(),
            format: config.logging.format,
            ansi_enabled: config.logging.ansi_enabled,
            include_location: config.logging.include_location,
            service_name: config.service_name.clone(),
            environment: config.environment.clone(),
            ..Self::default()
        }
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_defaults() {
        let config = ValidationConfig::default();
        assert!(!config.enforce_upper_bounds);
        assert_eq!(config.max_depth, 32);
        assert_eq!(BuildOptions::from(&config), BuildOptions::default());
    }

    #[test]
    fn test_validation_rejects_unknown_fields() {
        let result: Result<ValidationConfig, _> =
            serde_json::from_str(r#"{"enforce_upper_bounds": true, "strict": true}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_logging_partial_json() {
        let config: LoggingConfig = serde_json::from_str(r#"{"format": "pretty"}"#).unwrap();
        assert!(config.enabled);
        assert_eq!(config.level, "info");
        assert_eq!(config.format, LogFormat::Pretty);
    }

    #[test]
    fn test_log_config_from_section() {
        let section = TelemetryConfigSection {
            service_name: "jackets".to_string(),
            environment: "staging".to_string(),
            logging: LoggingConfig {
                level: "debug".to_string(),
                include_location: true,
                ..LoggingConfig::default()
            },
            ..TelemetryConfigSection::default()
        };

        let log = LogConfig::from(&section);
        assert_eq!(log.service_name, "jackets");
        assert_eq!(log.environment, "staging");
        assert_eq!(log.level, "debug");
        assert!(log.include_location);
        assert!(log.include_target);
    }
}
