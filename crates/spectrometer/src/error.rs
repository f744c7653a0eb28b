//! Error types for the spectrometer crate.

use thiserror::Error;

/// Result type alias for spectrometer operations.
pub type SpectrometerResult<T> = Result<T, SpectrometerError>;

/// Errors that can occur in registry, driver and device operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpectrometerError {
    /// No device with this id was discovered.
    #[error("Device not found: {0}")]
    NotFound(String),

    /// A configuration body could not be parsed. The detail is kept for logs;
    /// clients only ever see "json formatting".
    #[error("json formatting")]
    InvalidBody(String),

    /// The device rejected a parameter value.
    #[error("out of range: {0}")]
    OutOfRange(String),

    /// Device enumeration failed.
    #[error("Device enumeration failed: {0}")]
    Enumeration(String),

    /// The device is no longer reachable.
    #[error("Device disconnected: {0}")]
    Disconnected(String),

    /// The driver reported a failure during I/O.
    #[error("Driver error on {device_id}: {message}")]
    Driver { device_id: String, message: String },

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SpectrometerError {
    /// Build an out-of-range error for a parameter with inclusive bounds.
    pub fn out_of_range(parameter: &str, min: i64, max: i64, value: i64) -> Self {
        SpectrometerError::OutOfRange(format!(
            "{} must be between {} and {}, got {}",
            parameter, min, max, value
        ))
    }
}

impl From<serde_json::Error> for SpectrometerError {
    fn from(err: serde_json::Error) -> Self {
        SpectrometerError::InvalidBody(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_facing_messages() {
        let err: SpectrometerError = serde_json::from_str::<serde_json::Value>("{oops")
            .unwrap_err()
            .into();
        assert_eq!(err.to_string(), "json formatting");

        let err = SpectrometerError::out_of_range("int_time", 3, 65000, 1);
        assert_eq!(
            err.to_string(),
            "out of range: int_time must be between 3 and 65000, got 1"
        );
    }
}
