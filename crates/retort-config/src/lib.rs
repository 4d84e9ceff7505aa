//! Typed configuration for Retort.
//!
//! This crate provides a strongly-typed configuration system with support for:
//! - TOML and JSON configuration files
//! - Environment variable overrides
//! - Strict validation (fails on unknown fields)
//! - Layered configuration (defaults → file → env)
//!
//! # Overview
//!
//! [`RetortConfig`] holds two sections:
//!
//! - [`ValidationConfig`] - How request objects are built (converted with
//!   `BuildOptions::from`)
//! - [`TelemetryConfigSection`] - Logging (converted with `LogConfig::from`)
//!
//! # Example
//!
//! ```no_run
//! use retort_config::ConfigLoader;
//!
//! # fn main() -> Result<(), retort_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_production()
//!     .with_optional_file("retort.toml")?
//!     .with_dotenv()?
//!     .with_env_prefix("RETORT")
//!     .load()?;
//!
//! println!("max nesting depth: {}", config.validation.max_depth);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! [validation]
//! enforce_upper_bounds = false
//! max_depth = 32
//!
//! [telemetry]
//! service_name = "my-service"
//! environment = "production"
//!
//! [telemetry.logging]
//! enabled = true
//! level = "info"
//! format = "json"
//! ansi_enabled = false
//! include_location = false
//! ```
//!
//! # Environment Variable Overrides
//!
//! Values can be overridden via environment variables using the format
//! `PREFIX__SECTION__KEY`. For example:
//!
//! - `RETORT__VALIDATION__ENFORCE_UPPER_BOUNDS=true`
//! - `RETORT__TELEMETRY__SERVICE_NAME=my-service`
//! - `RETORT__TELEMETRY__LOGGING__FORMAT=pretty`

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::{RetortConfig, RetortConfigBuilder};
pub use error::ConfigError;
pub use loader::{ConfigLoader, DEFAULT_ENV_PREFIX};
pub use retort_telemetry::LogFormat;
pub use schema::{LoggingConfig, TelemetryConfigSection, ValidationConfig};
