//! Main configuration types.
//!
//! This module provides the top-level [`RetortConfig`] struct and its builder.

use serde::{Deserialize, Serialize};

use crate::{ConfigError, LogFormat, TelemetryConfigSection, ValidationConfig};

/// Complete Retort configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load configuration from files
/// and environment variables.
///
/// # Example
///
/// ```
/// use retort_config::RetortConfig;
///
/// let config = RetortConfig::default();
/// assert_eq!(config.validation.max_depth, 32);
/// assert!(!config.validation.enforce_upper_bounds);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct RetortConfig {
    /// Object building configuration.
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Telemetry configuration.
    #[serde(default)]
    pub telemetry: TelemetryConfigSection,
}

impl RetortConfig {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```
    /// use retort_config::{RetortConfig, ValidationConfig};
    ///
    /// let config = RetortConfig::builder()
    ///     .validation(ValidationConfig {
    ///         enforce_upper_bounds: true,
    ///         ..Default::default()
    ///     })
    ///     .build();
    ///
    /// assert!(config.validation.enforce_upper_bounds);
    /// ```
    #[must_use]
    pub fn builder() -> RetortConfigBuilder {
        RetortConfigBuilder::new()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - `validation.max_depth` is zero
    /// - `telemetry.service_name` is empty
    /// - `telemetry.logging.level` is not a valid filter while logging is enabled
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.validation.max_depth == 0 {
            return Err(ConfigError::invalid_value(
                "validation.max_depth",
                "must be at least 1",
            ));
        }

        if self.telemetry.service_name.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "telemetry.service_name",
                "must not be empty",
            ));
        }

        let logging = &self.telemetry.logging;
        if logging.enabled {
            if logging.level.trim().is_empty() {
                return Err(ConfigError::invalid_value(
                    "telemetry.logging.level",
                    "must not be empty",
                ));
            }
            retort_telemetry::create_env_filter(&logging.level).map_err(|e| {
                ConfigError::invalid_value("telemetry.logging.level", e.to_string())
            })?;
        }

        Ok(())
    }

    /// Create a development configuration preset.
    ///
    /// - Pretty log formatting with ANSI colors
    /// - Debug log level
    /// - Upper bounds and patterns enforced, so schema mistakes surface early
    ///
    /// # Example
    ///
    /// ```
    /// use retort_config::RetortConfig;
    ///
    /// let config = RetortConfig::development();
    /// assert_eq!(config.telemetry.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();

        config.telemetry.logging.level = "debug".to_string();
        config.telemetry.logging.format = LogFormat::Pretty;
        config.telemetry.logging.ansi_enabled = true;
        config.telemetry.logging.include_location = true;
        config.telemetry.environment = "development".to_string();

        config.validation.enforce_upper_bounds = true;

        config
    }

    /// Create a production configuration preset.
    ///
    /// - JSON log formatting
    /// - Info log level
    /// - Declared minimums only
    ///
    /// # Example
    ///
    /// ```
    /// use retort_config::RetortConfig;
    ///
    /// let config = RetortConfig::production();
    /// assert_eq!(config.telemetry.logging.format, retort_config::LogFormat::Json);
    /// ```
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();

        config.telemetry.logging.level = "info".to_string();
        config.telemetry.logging.format = LogFormat::Json;
        config.telemetry.logging.ansi_enabled = false;
        config.telemetry.environment = "production".to_string();

        config.validation.enforce_upper_bounds = false;

        config
    }
}

/// Builder for [`RetortConfig`].
#[derive(Debug, Default)]
pub struct RetortConfigBuilder {
    config: RetortConfig,
}

impl RetortConfigBuilder {
    /// Create a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the validation configuration.
    #[must_use]
    pub fn validation(mut self, validation: ValidationConfig) -> Self {
        self.config.validation = validation;
        self
    }

    /// Set the telemetry configuration.
    #[must_use]
    pub fn telemetry(mut self, telemetry: TelemetryConfigSection) -> Self {
        self.config.telemetry = telemetry;
        self
    }

    /// Set the service name.
    #[must_use]
    pub fn service_name(mut self, name: impl Into<String>) -> Self {
        self.config.telemetry.service_name = name.into();
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> RetortConfig {
        self.config
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if validation fails.
    pub fn build_validated(self) -> Result<RetortConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(RetortConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_depth_invalid() {
        let mut config = RetortConfig::default();
        config.validation.max_depth = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("validation.max_depth"));
    }

    #[test]
    fn test_invalid_level_only_checked_when_enabled() {
        let mut config = RetortConfig::default();
        config.telemetry.logging.level = "retort_core=loud".to_string();
        assert!(config.validate().is_err());

        config.telemetry.logging.enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_service_name_invalid() {
        let result = RetortConfig::builder().service_name(" ").build_validated();
        assert!(result.is_err());
    }

    #[test]
    fn test_presets() {
        let dev = RetortConfig::development();
        assert!(dev.validation.enforce_upper_bounds);
        assert_eq!(dev.telemetry.logging.format, LogFormat::Pretty);
        assert!(dev.validate().is_ok());

        let prod = RetortConfig::production();
        assert!(!prod.validation.enforce_upper_bounds);
        assert_eq!(prod.telemetry.environment, "production");
        assert!(prod.validate().is_ok());
    }

    #[test]
    fn test_serde_roundtrip_keeps_sections() {
        let config = RetortConfig::development();
        let toml = toml::to_string(&config).unwrap();
        assert!(toml.contains("[validation]"));
        assert!(toml.contains("[telemetry.logging]"));
        let parsed: RetortConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed, config);
    }
}
