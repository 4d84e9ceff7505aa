//! Layered configuration loading.
//!
//! Every source is turned into a JSON tree, checked against
//! [`RetortConfig`], and overlaid onto the current value key by key.

use std::env;
use std::fs;
use std::path::Path;

use serde_json::{Map, Value};

use crate::{ConfigError, LogFormat, RetortConfig};

/// Environment variable prefix used by [`ConfigLoader::with_default_env_prefix`].
pub const DEFAULT_ENV_PREFIX: &str = "RETORT";

/// Builds a [`RetortConfig`] from defaults, files, strings and the environment.
///
/// Later layers win:
/// 1. Default values or a preset
/// 2. Configuration files and strings (TOML or JSON)
/// 3. `PREFIX__SECTION__KEY` environment variables, applied by [`load`](Self::load)
///
/// # Example
///
/// ```no_run
/// use retort_config::ConfigLoader;
///
/// # fn main() -> Result<(), retort_config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_defaults()
///     .with_file("retort.toml")?
///     .with_env_prefix("RETORT")
///     .load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ConfigLoader {
    config: RetortConfig,
    env_prefix: Option<String>,
    file_loaded: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Toml,
    Json,
}

impl Format {
    fn from_name(name: &str) -> Result<Self, ConfigError> {
        match name.to_ascii_lowercase().as_str() {
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::UnsupportedFormat(other.to_string())),
        }
    }

    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
        Self::from_name(extension)
    }

    // Unknown keys are reported by the typed parse, in the source format.
    fn parse(self, content: &str) -> Result<Value, ConfigError> {
        match self {
            Self::Toml => {
                toml::from_str::<RetortConfig>(content)?;
                Ok(toml::from_str(content)?)
            }
            Self::Json => {
                serde_json::from_str::<RetortConfig>(content)?;
                Ok(serde_json::from_str(content)?)
            }
        }
    }
}

/// How an override variable's value is parsed.
#[derive(Debug, Clone, Copy)]
enum EnvKind {
    Bool,
    Count,
    Text,
    LogFormat,
}

const ENV_KEYS: &[(&[&str], EnvKind)] = &[
    (&["validation", "enforce_upper_bounds"], EnvKind::Bool),
    (&["validation", "max_depth"], EnvKind::Count),
    (&["telemetry", "service_name"], EnvKind::Text),
    (&["telemetry", "environment"], EnvKind::Text),
    (&["telemetry", "logging", "enabled"], EnvKind::Bool),
    (&["telemetry", "logging", "level"], EnvKind::Text),
    (&["telemetry", "logging", "format"], EnvKind::LogFormat),
    (&["telemetry", "logging", "ansi_enabled"], EnvKind::Bool),
    (&["telemetry", "logging", "include_location"], EnvKind::Bool),
];

impl ConfigLoader {
    /// Creates a loader starting from [`RetortConfig::default`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets to default values, dropping earlier layers.
    #[must_use]
    pub fn with_defaults(mut self) -> Self {
        self.config = RetortConfig::default();
        self
    }

    /// Resets to the development preset.
    ///
    /// # Example
    ///
    /// ```
    /// use retort_config::ConfigLoader;
    ///
    /// let config = ConfigLoader::new()
    ///     .with_development()
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(config.telemetry.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn with_development(mut self) -> Self {
        self.config = RetortConfig::development();
        self
    }

    /// Resets to the production preset.
    #[must_use]
    pub fn with_production(mut self) -> Self {
        self.config = RetortConfig::production();
        self
    }

    /// Overlays a `.toml` or `.json` file.
    ///
    /// Keys present in the file replace current values; absent keys keep them.
    ///
    /// # Errors
    ///
    /// Fails if the file is missing or unreadable, has another extension,
    /// is malformed, or contains unknown keys.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::missing_file(path));
        }

        let format = Format::from_path(path)?;
        let content = fs::read_to_string(path).map_err(|e| ConfigError::read(path, e))?;
        self.overlay(format.parse(&content)?)?;
        self.file_loaded = true;
        Ok(self)
    }

    /// Like [`with_file`](Self::with_file), but a missing file is skipped.
    ///
    /// # Errors
    ///
    /// Fails if the file exists but cannot be loaded.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Overlays configuration text in the named format (`"toml"` or `"json"`).
    ///
    /// # Errors
    ///
    /// Fails on an unknown format, malformed content, or unknown keys.
    ///
    /// # Example
    ///
    /// ```
    /// use retort_config::ConfigLoader;
    ///
    /// let toml = r#"
    ///     [validation]
    ///     enforce_upper_bounds = true
    /// "#;
    ///
    /// let config = ConfigLoader::new()
    ///     .with_string(toml, "toml")
    ///     .unwrap()
    ///     .load()
    ///     .unwrap();
    ///
    /// assert!(config.validation.enforce_upper_bounds);
    /// assert_eq!(config.validation.max_depth, 32);
    /// ```
    pub fn with_string(mut self, content: &str, format: &str) -> Result<Self, ConfigError> {
        let layer = Format::from_name(format)?.parse(content)?;
        self.overlay(layer)?;
        Ok(self)
    }

    /// Reads overrides from `PREFIX__SECTION__KEY` variables when loading,
    /// e.g. `RETORT__VALIDATION__MAX_DEPTH=16`.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Reads overrides using [`DEFAULT_ENV_PREFIX`].
    #[must_use]
    pub fn with_default_env_prefix(self) -> Self {
        self.with_env_prefix(DEFAULT_ENV_PREFIX)
    }

    /// Loads `.env` from the current directory or a parent, if there is one.
    ///
    /// # Errors
    ///
    /// Fails if a `.env` file exists but cannot be parsed.
    pub fn with_dotenv(self) -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(e) if e.not_found() => Ok(self),
            Err(e) => Err(e.into()),
        }
    }

    /// Loads variables from a specific env file without overwriting ones
    /// already set.
    ///
    /// # Errors
    ///
    /// Fails if the file is missing or invalid.
    pub fn with_dotenv_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        dotenvy::from_path(path.as_ref())?;
        Ok(self)
    }

    /// Whether a configuration file has been overlaid.
    #[must_use]
    pub fn file_loaded(&self) -> bool {
        self.file_loaded
    }

    /// Applies environment overrides and returns the validated configuration.
    ///
    /// # Errors
    ///
    /// Fails if an override cannot be parsed or
    /// [`RetortConfig::validate`] rejects the result.
    pub fn load(mut self) -> Result<RetortConfig, ConfigError> {
        if let Some(prefix) = self.env_prefix.take() {
            let layer = env_layer(&prefix, env::vars())?;
            self.overlay(layer)?;
        }

        self.config.validate()?;
        Ok(self.config)
    }

    /// Returns the configuration without environment overrides or validation.
    #[must_use]
    pub fn load_unvalidated(self) -> RetortConfig {
        self.config
    }

    fn overlay(&mut self, layer: Value) -> Result<(), ConfigError> {
        let mut merged = serde_json::to_value(&self.config)?;
        merge_values(&mut merged, layer);
        self.config = serde_json::from_value(merged)?;
        Ok(())
    }
}

/// Turns `PREFIX__SECTION__KEY` variables into a config tree.
///
/// Variables that share the prefix but name no known key are ignored.
fn env_layer(
    prefix: &str,
    vars: impl IntoIterator<Item = (String, String)>,
) -> Result<Value, ConfigError> {
    let mut layer = Value::Object(Map::new());

    for (var, raw) in vars {
        let Some(rest) = var.strip_prefix(prefix).and_then(|k| k.strip_prefix("__")) else {
            continue;
        };
        let path: Vec<String> = rest.split("__").map(str::to_ascii_lowercase).collect();
        let Some((keys, kind)) = ENV_KEYS.iter().find(|(keys, _)| *keys == path.as_slice()) else {
            continue;
        };

        let value = parse_env_value(*kind, &raw).map_err(|reason| ConfigError::env_var(&var, reason))?;
        let nested = keys.iter().rev().fold(value, |inner, key| {
            let mut map = Map::new();
            map.insert((*key).to_string(), inner);
            Value::Object(map)
        });
        merge_values(&mut layer, nested);
    }

    Ok(layer)
}

fn parse_env_value(kind: EnvKind, raw: &str) -> Result<Value, &'static str> {
    match kind {
        EnvKind::Bool => parse_bool(raw).map(Value::Bool).ok_or("expected boolean"),
        EnvKind::Count => raw
            .trim()
            .parse::<u64>()
            .map(Value::from)
            .map_err(|_| "expected integer"),
        EnvKind::Text => Ok(Value::String(raw.to_string())),
        EnvKind::LogFormat => raw
            .parse::<LogFormat>()
            .map(|format| Value::String(format.to_string()))
            .map_err(|_| "expected 'json' or 'pretty'"),
    }
}

/// Overlays `layer` onto `base`; objects merge, everything else replaces.
fn merge_values(base: &mut Value, layer: Value) {
    match (base, layer) {
        (Value::Object(base), Value::Object(layer)) => {
            for (key, value) in layer {
                match base.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, layer) => *base = layer,
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
