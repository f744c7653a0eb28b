//! Domain types shared by devices, the registry and the HTTP facade.

use crate::error::{SpectrometerError, SpectrometerResult};
use serde::{Deserialize, Serialize};

/// Configuration as reported by a device.
///
/// The registry never interprets these fields; it relays them and tags
/// writes with a version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceConfig {
    pub device_id: String,
    pub model: String,
    /// Wavelength calibration coefficients `[c1, c2, c3, c4]`.
    pub coeffs: [f64; 4],
    /// Integration time in milliseconds.
    pub int_time: u32,
    pub scans_to_avg: u32,
    /// Boxcar smoothing level, 0 = off.
    pub x_smooth: u8,
    /// Detector timing mode.
    pub x_timing: u8,
    /// Temperature compensation.
    pub temp_comp: bool,
}

/// A partial configuration write, as sent in `PUT /spectrometers/{id}/config`.
///
/// Numeric fields are kept wide so that negative or oversized values reach
/// the device and come back as range errors rather than parse errors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub int_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scans_to_avg: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_smooth: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_timing: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_comp: Option<bool>,
}

impl ConfigUpdate {
    /// Parse a request body. The body must be a JSON object; the request's
    /// content type is not consulted.
    pub fn from_json_slice(body: &[u8]) -> SpectrometerResult<Self> {
        let value: serde_json::Value = serde_json::from_slice(body)?;
        if !value.is_object() {
            return Err(SpectrometerError::InvalidBody(
                "configuration must be a JSON object".to_string(),
            ));
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn with_int_time(mut self, ms: i64) -> Self {
        self.int_time = Some(ms);
        self
    }

    pub fn with_scans_to_avg(mut self, scans: i64) -> Self {
        self.scans_to_avg = Some(scans);
        self
    }

    pub fn with_x_smooth(mut self, level: i64) -> Self {
        self.x_smooth = Some(level);
        self
    }

    pub fn with_x_timing(mut self, mode: i64) -> Self {
        self.x_timing = Some(mode);
        self
    }

    pub fn with_temp_comp(mut self, enabled: bool) -> Self {
        self.temp_comp = Some(enabled);
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// One full detector read.
///
/// `config_id` is the registry version at the last successful configuration
/// write, not a guarantee about the settings in effect during the read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectrumReading {
    pub data: Vec<f64>,
    /// Capture time, milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub config_id: u64,
}

/// Inclusive bounds for an integer acquisition parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterRange {
    pub name: &'static str,
    pub min: i64,
    pub max: i64,
}

impl ParameterRange {
    pub const fn new(name: &'static str, min: i64, max: i64) -> Self {
        Self { name, min, max }
    }

    /// Check `value`, returning the device's out-of-range error on failure.
    pub fn check(&self, value: i64) -> SpectrometerResult<i64> {
        if value < self.min || value > self.max {
            return Err(SpectrometerError::out_of_range(
                self.name, self.min, self.max, value,
            ));
        }
        Ok(value)
    }
}

/// Supported parameter ranges.
pub mod limits {
    use super::ParameterRange;

    pub const INT_TIME_MS: ParameterRange = ParameterRange::new("int_time", 3, 65000);
    pub const SCANS_TO_AVG: ParameterRange = ParameterRange::new("scans_to_avg", 1, 10000);
    pub const X_SMOOTH: ParameterRange = ParameterRange::new("x_smooth", 0, 4);
    pub const X_TIMING: ParameterRange = ParameterRange::new("x_timing", 1, 3);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_update() {
        let update =
            ConfigUpdate::from_json_slice(br#"{"int_time":50,"scans_to_avg":1}"#).unwrap();
        assert_eq!(
            update,
            ConfigUpdate::default().with_int_time(50).with_scans_to_avg(1)
        );
        assert!(ConfigUpdate::from_json_slice(b"{}").unwrap().is_empty());
    }

    #[test]
    fn test_negative_values_parse() {
        let update = ConfigUpdate::from_json_slice(br#"{"int_time":-5}"#).unwrap();
        assert_eq!(update.int_time, Some(-5));
    }

    #[test]
    fn test_invalid_bodies() {
        for body in [
            &b"not json"[..],
            b"[50, 1]",
            b"42",
            br#"{"int_time":"fast"}"#,
            br#"{"colour":"blue"}"#,
            b"",
        ] {
            let err = ConfigUpdate::from_json_slice(body).unwrap_err();
            assert!(
                matches!(err, SpectrometerError::InvalidBody(_)),
                "{:?}",
                String::from_utf8_lossy(body)
            );
        }
    }

    #[test]
    fn test_parameter_range() {
        assert_eq!(limits::INT_TIME_MS.check(3).unwrap(), 3);
        assert_eq!(limits::INT_TIME_MS.check(65000).unwrap(), 65000);
        assert!(limits::INT_TIME_MS.check(2).is_err());
        assert!(limits::X_SMOOTH.check(5).is_err());
    }

    #[test]
    fn test_spectrum_wire_shape() {
        let reading = SpectrumReading {
            data: vec![1.0, 2.5],
            timestamp: 1_700_000_000_000,
            config_id: 1,
        };
        let json = serde_json::to_value(&reading).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"data": [1.0, 2.5], "timestamp": 1_700_000_000_000i64, "config_id": 1})
        );
    }
}
