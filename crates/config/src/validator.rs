use crate::*;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Server host is required")]
    MissingHost,

    #[error("{field} cannot be 0")]
    ZeroPort { field: String },

    #[error("metrics.port {port} collides with server.port")]
    PortCollision { port: u16 },

    #[error("Device {device_id}: {message}")]
    InvalidDevice { device_id: String, message: String },

    #[error("Duplicate device id '{0}'")]
    DuplicateDevice(String),

    #[error("Invalid log format: {0}. Must be one of: pretty, json, compact")]
    InvalidLogFormat(String),

    #[error("Unresolved environment variable placeholder in {field}: {value}")]
    UnresolvedEnvVar { field: String, value: String },
}

#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, field: &str, message: &str) {
        self.warnings.push(ValidationWarning {
            field: field.to_string(),
            message: message.to_string(),
        });
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

pub fn validate_config(config: &SpecdConfig) -> ValidationReport {
    let mut report = ValidationReport::new();

    validate_server(&config.server, &mut report);
    validate_driver(&config.driver, &mut report);
    validate_logging(&config.logging, &mut report);
    validate_metrics(&config.metrics, &config.server, &mut report);

    report
}

fn validate_server(server: &ServerSection, report: &mut ValidationReport) {
    if server.host.trim().is_empty() {
        report.add_error(ValidationError::MissingHost);
    } else if has_unresolved_env_vars(&server.host).unwrap_or(false) {
        report.add_error(ValidationError::UnresolvedEnvVar {
            field: "server.host".to_string(),
            value: server.host.clone(),
        });
    }

    if server.port == 0 {
        report.add_error(ValidationError::ZeroPort {
            field: "server.port".to_string(),
        });
    } else if server.port < 1024 {
        report.add_warning(
            "server.port",
            "Ports below 1024 require elevated privileges",
        );
    }
}

fn validate_driver(driver: &DriverConfig, report: &mut ValidationReport) {
    if driver.devices.is_empty() {
        report.add_warning(
            "driver.devices",
            "No devices configured; GET /spectrometers will return an empty list",
        );
        return;
    }

    let mut seen = HashSet::new();
    for device in &driver.devices {
        validate_device(device, report);
        if !device.device_id.is_empty() && !seen.insert(device.device_id.as_str()) {
            report.add_error(ValidationError::DuplicateDevice(device.device_id.clone()));
        }
    }
}

fn validate_device(device: &SimulatedDeviceConfig, report: &mut ValidationReport) {
    let id = if device.device_id.is_empty() {
        "unknown".to_string()
    } else {
        device.device_id.clone()
    };
    let mut invalid = |message: String| {
        report.add_error(ValidationError::InvalidDevice {
            device_id: id.clone(),
            message,
        });
    };

    if device.device_id.trim().is_empty() {
        invalid("device_id is required".to_string());
    }

    if device.pixels < 2 {
        invalid(format!("pixels must be at least 2, got: {}", device.pixels));
    }

    if device.coeffs.iter().any(|c| !c.is_finite()) {
        invalid("coeffs must be finite numbers".to_string());
    }

    if !(0.0..=65535.0).contains(&device.dark_level) {
        invalid(format!(
            "dark_level must be within the 16-bit detector range, got: {}",
            device.dark_level
        ));
    }

    if device.noise < 0.0 || !device.noise.is_finite() {
        invalid(format!("noise must be non-negative, got: {}", device.noise));
    }

    for peak in &device.peaks {
        if peak.width_nm <= 0.0 || !peak.width_nm.is_finite() {
            invalid(format!(
                "peak at {} nm: width_nm must be positive, got: {}",
                peak.center_nm, peak.width_nm
            ));
        }
        if peak.height < 0.0 || !peak.height.is_finite() {
            invalid(format!(
                "peak at {} nm: height must be non-negative, got: {}",
                peak.center_nm, peak.height
            ));
        }
    }
}

fn validate_logging(logging: &LoggingConfig, report: &mut ValidationReport) {
    let format = logging.format.to_lowercase();
    if !LOG_FORMATS.contains(&format.as_str()) {
        report.add_error(ValidationError::InvalidLogFormat(logging.format.clone()));
    }
}

fn validate_metrics(metrics: &MetricsConfig, server: &ServerSection, report: &mut ValidationReport) {
    if !metrics.enabled {
        return;
    }

    if metrics.port == 0 {
        report.add_error(ValidationError::ZeroPort {
            field: "metrics.port".to_string(),
        });
    } else if metrics.port == server.port {
        report.add_error(ValidationError::PortCollision { port: metrics.port });
    }
}
