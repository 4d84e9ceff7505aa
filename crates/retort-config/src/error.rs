//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating a [`RetortConfig`](crate::RetortConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required configuration file does not exist.
    #[error("missing config file {}", path.display())]
    MissingFile {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// A configuration file exists but could not be read.
    #[error("cannot read config file {}", path.display())]
    Read {
        /// Path of the file.
        path: PathBuf,
        /// I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A TOML layer is malformed or has unknown keys.
    #[error("bad TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    /// A JSON layer is malformed or has unknown keys.
    #[error("bad JSON config: {0}")]
    Json(#[from] serde_json::Error),

    /// A `.env` file could not be loaded.
    #[error("cannot load .env: {0}")]
    Dotenv(#[from] dotenvy::Error),

    /// A layer uses a format other than TOML or JSON.
    #[error("unsupported config format '{0}' (expected toml or json)")]
    UnsupportedFormat(String),

    /// A loaded value breaks a constraint.
    #[error("{field}: {reason}")]
    InvalidValue {
        /// Dotted path of the offending key.
        field: String,
        /// What is wrong with it.
        reason: String,
    },

    /// An override variable has an unparsable value.
    #[error("{var}: {reason}")]
    EnvVar {
        /// The variable name.
        var: String,
        /// What was expected.
        reason: String,
    },
}

impl ConfigError {
    pub(crate) fn missing_file(path: impl Into<PathBuf>) -> Self {
        Self::MissingFile { path: path.into() }
    }

    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Creates an [`InvalidValue`](Self::InvalidValue) error for `field`.
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn env_var(var: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::EnvVar {
            var: var.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = ConfigError::invalid_value("validation.max_depth", "must be at least 1");
        assert_eq!(err.to_string(), "validation.max_depth: must be at least 1");

        let err = ConfigError::env_var("RETORT__VALIDATION__MAX_DEPTH", "expected integer");
        assert_eq!(
            err.to_string(),
            "RETORT__VALIDATION__MAX_DEPTH: expected integer"
        );

        let err = ConfigError::UnsupportedFormat("yaml".into());
        assert!(err.to_string().contains("'yaml'"));
    }

    #[test]
    fn test_missing_file_names_path() {
        let err = ConfigError::missing_file("conf/retort.toml");
        assert_eq!(err.to_string(), "missing config file conf/retort.toml");
    }
}
