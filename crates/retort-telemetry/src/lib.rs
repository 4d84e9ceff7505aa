//! Logging setup for Retort.
//!
//! Retort's crates report through `tracing`. This crate installs a
//! `tracing-subscriber` registry with an `EnvFilter` and a JSON or pretty
//! formatting layer.
//!
//! # Example
//!
//! ```rust,ignore
//! use retort_telemetry::{init_logging, LogConfig, LogFormat};
//!
//! let config = LogConfig {
//!     level: "retort_core=debug,info".to_string(),
//!     format: LogFormat::Pretty,
//!     ..LogConfig::default()
//! };
//! init_logging(&config)?;
//! ```

#![doc(html_root_url = "https://docs.rs/retort-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, init_logging, LogConfig, LogFormat};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
