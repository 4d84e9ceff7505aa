//! Telemetry error types.

use thiserror::Error;

/// Errors raised while installing the log subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// Failed to initialize logging.
    #[error("logging setup failed: {0}")]
    LoggingInit(String),

    /// Invalid configuration.
    #[error("invalid telemetry setting: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TelemetryError::LoggingInit("already set".to_string());
        assert_eq!(err.to_string(), "logging setup failed: already set");

        let err = TelemetryError::InvalidConfig("unknown format".to_string());
        assert_eq!(err.to_string(), "invalid telemetry setting: unknown format");
    }
}
