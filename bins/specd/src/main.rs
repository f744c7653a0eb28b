//! specd CLI and Server Binary
//!
//! Entry point for the spectrometer service. `start`, `validate` and `init`
//! operate on the YAML configuration; `devices`, `watch` and `capture` talk
//! to a running instance over HTTP.

mod commands;

use anyhow::{Context, Result};
use cli::{Cli, Commands, LogFormatArg};
use config::{
    generate_default_config, load_config, save_config, validate_config, DriverBackend,
    SpecdConfig,
};
use observability::{init_logging, init_metrics, LogFormat};
use server::{
    validate_port_available, validate_port_range, HttpServer, ServerConfig, ServerExt,
};
use spectrometer::{
    spectrometer_routes, DeviceRegistry, SimulatedDriver, SpectrometerApiState,
    SpectrometerDriver,
};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

const SERVICE_NAME: &str = "specd";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    match cli.command {
        Commands::Start {
            config,
            host,
            port,
            log_format,
        } => start_service(config, host, port, log_format).await,
        Commands::Validate { config } => {
            init_logging(SERVICE_NAME, LogFormat::Pretty)?;
            validate_command(config)
        }
        Commands::Init { output } => {
            init_logging(SERVICE_NAME, LogFormat::Pretty)?;
            init_command(output)
        }
        Commands::Devices { url } => {
            init_logging(SERVICE_NAME, LogFormat::Compact)?;
            commands::devices(&url).await
        }
        Commands::Watch {
            url,
            device,
            interval_ms,
            monitor_nm,
            int_time,
            scans,
            count,
        } => {
            init_logging(SERVICE_NAME, LogFormat::Compact)?;
            let options = commands::WatchOptions {
                device,
                interval_ms,
                monitor_nm,
                int_time,
                scans,
                count,
            };
            commands::watch(&url, options).await
        }
        Commands::Capture {
            url,
            device,
            output,
            dark,
            incident,
        } => {
            init_logging(SERVICE_NAME, LogFormat::Compact)?;
            commands::capture(&url, device, &output, dark.as_deref(), incident.as_deref()).await
        }
    }
}

async fn start_service<P: AsRef<Path>>(
    config_path: P,
    host_override: Option<String>,
    port_override: Option<u16>,
    log_format_override: Option<LogFormatArg>,
) -> Result<()> {
    let config_path = config_path.as_ref();
    let mut config = load_config(config_path).with_context(|| {
        format!(
            "Failed to load {:?} (run 'specd init' to create one)",
            config_path
        )
    })?;

    if let Some(format) = log_format_override {
        config.logging.format = format.as_str().to_string();
    }
    let log_format = LogFormat::parse(&config.logging.format).unwrap_or_default();
    init_logging(SERVICE_NAME, log_format)?;

    if let Some(host) = host_override {
        debug!(%host, "Overriding server host");
        config.server.host = host;
    }
    if let Some(port) = port_override {
        debug!(port, "Overriding server port");
        config.server.port = port;
    }

    let report = validate_config(&config);
    for warning in &report.warnings {
        warn!(field = %warning.field, message = %warning.message);
    }
    if !report.is_valid() {
        error!(
            error_count = report.errors.len(),
            "Configuration validation failed"
        );
        for err in &report.errors {
            error!("{}", err);
        }
        anyhow::bail!("Cannot start specd due to configuration errors");
    }

    if config.metrics.enabled {
        init_metrics(config.metrics.port)?;
    }

    let driver = build_driver(&config);
    info!(
        driver = driver.name(),
        host = %config.server.host,
        port = config.server.port,
        "Starting specd"
    );

    let registry = Arc::new(DeviceRegistry::new(driver));
    let routes = spectrometer_routes(Arc::new(SpectrometerApiState::new(registry)));

    validate_port_range(config.server.port)?;
    let server_config = ServerConfig::new(config.server.host.clone(), config.server.port);
    validate_port_available(&server_config).await?;

    HttpServer::new(server_config, SERVICE_NAME, routes)
        .run_with_ctrl_c()
        .await?;

    Ok(())
}

fn build_driver(config: &SpecdConfig) -> Arc<dyn SpectrometerDriver> {
    match config.driver.backend {
        DriverBackend::Simulated => Arc::new(SimulatedDriver::from_config(&config.driver)),
    }
}

fn validate_command<P: AsRef<Path>>(config_path: P) -> Result<()> {
    info!(path = ?config_path.as_ref(), "Validating configuration");

    let config = match load_config(&config_path) {
        Ok(c) => c,
        Err(e) => {
            error!(%e, "Failed to load configuration");
            return Err(e);
        }
    };

    let report = validate_config(&config);

    println!("\n=== Configuration Validation Report ===\n");

    if !report.warnings.is_empty() {
        println!("Warnings ({}):", report.warnings.len());
        for warning in &report.warnings {
            println!("  [warn] [{}] {}", warning.field, warning.message);
        }
        println!();
    }

    if !report.errors.is_empty() {
        println!("Errors ({}):", report.errors.len());
        for err in &report.errors {
            println!("  [error] {}", err);
        }
        println!();
        anyhow::bail!("Configuration validation failed");
    }

    println!("[ok] Configuration is valid!");
    println!();
    println!("Listen: {}:{}", config.server.host, config.server.port);
    println!("Driver: {:?}", config.driver.backend);
    println!("Devices: {}", config.driver.devices.len());
    for device in &config.driver.devices {
        println!(
            "  - {} ({}, {} pixels, {} peaks)",
            device.device_id,
            device.model,
            device.pixels,
            device.peaks.len()
        );
    }

    Ok(())
}

fn init_command<P: AsRef<Path>>(output_path: P) -> Result<()> {
    let output_path = output_path.as_ref();
    info!(?output_path, "Initializing new configuration file");

    let config = generate_default_config();

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
    }

    save_config(&config, output_path)?;

    println!("[ok] Configuration file created successfully!");
    println!();
    println!("Location: {:?}", output_path);
    println!();
    println!("Next steps:");
    println!("  1. Edit the simulated devices or server settings");
    println!(
        "  2. Run 'specd validate --config {:?}' to check configuration",
        output_path
    );
    println!(
        "  3. Run 'specd start --config {:?}' to start the service",
        output_path
    );

    Ok(())
}
