use crate::*;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info, instrument};

#[instrument(skip(path))]
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SpecdConfig> {
    let path = path.as_ref();
    info!("Loading configuration from: {:?}", path);

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    debug!("Config file content length: {} bytes", content.len());

    let config = parse_config(&content)?;

    info!(
        devices = config.driver.devices.len(),
        "Configuration loaded successfully"
    );
    Ok(config)
}

/// Parse configuration text, substituting environment variables first.
pub fn parse_config(content: &str) -> Result<SpecdConfig> {
    let substituted = substitution::substitute_env_vars(content)?;
    debug!("Environment variable substitution completed");

    serde_yaml::from_str(&substituted).with_context(|| "Failed to parse YAML configuration")
}

#[instrument]
pub fn generate_default_config() -> SpecdConfig {
    SpecdConfig {
        server: ServerSection::default(),
        driver: DriverConfig {
            backend: DriverBackend::Simulated,
            devices: vec![SimulatedDeviceConfig {
                device_id: "SN12345".to_string(),
                model: default_model(),
                pixels: default_pixels(),
                coeffs: default_coeffs(),
                dark_level: default_dark_level(),
                noise: default_noise(),
                peaks: vec![
                    // Tungsten-halogen continuum
                    PeakConfig {
                        center_nm: 620.0,
                        height: 28000.0,
                        width_nm: 110.0,
                    },
                    // Deuterium alpha line
                    PeakConfig {
                        center_nm: 656.1,
                        height: 9000.0,
                        width_nm: 1.2,
                    },
                ],
            }],
        },
        logging: LoggingConfig::default(),
        metrics: MetricsConfig::default(),
    }
}

#[instrument]
pub fn save_config<P: AsRef<Path> + std::fmt::Debug>(config: &SpecdConfig, path: P) -> Result<()> {
    let path = path.as_ref();
    info!("Saving configuration to: {:?}", path);

    let yaml = serde_yaml::to_string(config)
        .with_context(|| "Failed to serialize configuration to YAML")?;

    fs::write(path, yaml)
        .with_context(|| format!("Failed to write config file: {:?}", path))?;

    info!("Configuration saved successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_yaml_uses_defaults() {
        let config = parse_config("driver:\n  devices:\n    - device_id: SN1\n").unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.driver.backend, DriverBackend::Simulated);

        let device = &config.driver.devices[0];
        assert_eq!(device.device_id, "SN1");
        assert_eq!(device.pixels, 2048);
        assert_eq!(device.coeffs, default_coeffs());
        assert!(device.peaks.is_empty());
    }

    #[test]
    fn test_empty_document() {
        let config = parse_config("{}").unwrap();
        assert!(config.driver.devices.is_empty());
        assert_eq!(config.logging.format, "pretty");
        assert!(!config.metrics.enabled);
    }

    #[test]
    fn test_unknown_backend_rejected() {
        assert!(parse_config("driver:\n  backend: usb\n").is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("specd.yaml");

        let config = generate_default_config();
        save_config(&config, &path).unwrap();
        let loaded = load_config(&path).unwrap();

        assert_eq!(loaded.driver.devices.len(), 1);
        assert_eq!(loaded.driver.devices[0].device_id, "SN12345");
        assert_eq!(loaded.driver.devices[0].peaks, config.driver.devices[0].peaks);
    }
}
