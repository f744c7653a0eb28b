//! Configuration for specd.
//!
//! The configuration is a single YAML file:
//!
//! ```yaml
//! server:
//!   host: 0.0.0.0
//!   port: 5000
//! driver:
//!   backend: simulated
//!   devices:
//!     - device_id: SN12345
//!       model: BLACK-Comet
//!       pixels: 2048
//!       coeffs: [0.62, -1.2e-5, 280.0, 0.0]
//!       peaks:
//!         - { center_nm: 600.0, height: 30000.0, width_nm: 120.0 }
//! logging:
//!   format: pretty
//! metrics:
//!   enabled: false
//!   port: 9100
//! ```
//!
//! `${VAR}` and `$VAR` placeholders are replaced from the environment before
//! parsing.

use serde::{Deserialize, Serialize};

pub mod defaults;
pub mod parser;
pub mod substitution;
pub mod validator;

pub use defaults::*;
pub use parser::*;
pub use substitution::*;
pub use validator::*;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SpecdConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub driver: DriverConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Which driver enumerates devices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DriverBackend {
    /// Synthetic devices described in `driver.devices`.
    #[default]
    Simulated,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DriverConfig {
    #[serde(default)]
    pub backend: DriverBackend,
    #[serde(default)]
    pub devices: Vec<SimulatedDeviceConfig>,
}

/// One synthetic spectrometer.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimulatedDeviceConfig {
    pub device_id: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_pixels")]
    pub pixels: usize,
    /// Wavelength calibration coefficients `[c1, c2, c3, c4]`.
    #[serde(default = "default_coeffs")]
    pub coeffs: [f64; 4],
    /// Counts reported with no light.
    #[serde(default = "default_dark_level")]
    pub dark_level: f64,
    /// Noise amplitude in counts for a single scan.
    #[serde(default = "default_noise")]
    pub noise: f64,
    /// Emission features, in counts at a 100 ms integration time.
    #[serde(default)]
    pub peaks: Vec<PeakConfig>,
}

/// A Gaussian emission feature.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PeakConfig {
    pub center_nm: f64,
    pub height: f64,
    pub width_nm: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// `pretty`, `json` or `compact`.
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: default_log_format(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MetricsConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_metrics_port")]
    pub port: u16,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            port: default_metrics_port(),
        }
    }
}
