//! Client commands against a running specd.

use anyhow::{Context, Result};
use server::{run_until_shutdown, ShutdownController};
use spectrometer::{ConfigUpdate, SpectrometerClient};
use spectrum::{read_csv, write_csv, AcquisitionSession, DisplayMode};
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

pub struct WatchOptions {
    pub device: Option<String>,
    pub interval_ms: u64,
    pub monitor_nm: Option<f64>,
    pub int_time: Option<i64>,
    pub scans: Option<i64>,
    pub count: Option<u64>,
}

pub async fn devices(url: &str) -> Result<()> {
    let client = SpectrometerClient::new(url)?;
    let ids = client.list_devices().await?;

    if ids.is_empty() {
        println!("No spectrometers attached at {}", client.base_url());
        return Ok(());
    }

    println!("Spectrometers at {} ({}):", client.base_url(), ids.len());
    for id in &ids {
        let config = client.get_config(id).await?;
        println!(
            "  - {} [{}] int_time={}ms scans_to_avg={} x_smooth={} x_timing={} temp_comp={}",
            config.device_id,
            config.model,
            config.int_time,
            config.scans_to_avg,
            config.x_smooth,
            config.x_timing,
            config.temp_comp
        );
    }
    Ok(())
}

/// Poll one device and log the processed value at the monitored wavelength.
pub async fn watch(url: &str, options: WatchOptions) -> Result<()> {
    let client = SpectrometerClient::new(url)?;
    let device_id = resolve_device(&client, options.device).await?;

    let update = ConfigUpdate {
        int_time: options.int_time,
        scans_to_avg: options.scans,
        ..ConfigUpdate::default()
    };
    if !update.is_empty() {
        let config_id = client.set_config(&device_id, &update).await?;
        info!(%device_id, config_id, ?update, "Configuration applied");
    }

    let mut session = open_session(&client, &device_id).await?;
    if let Some(target) = options.monitor_nm {
        let actual = session.set_monitor(target)?;
        info!(requested = target, actual, "Monitoring wavelength");
    }

    let shutdown = ShutdownController::with_signals();
    let interval = Duration::from_millis(options.interval_ms);
    let mut reads = 0u64;

    loop {
        let next = run_until_shutdown(shutdown.token(), client.read_spectrum(&device_id)).await;
        let Some(reading) = next else { break };
        let reading = reading?;
        let processed = session.process(&reading.data)?;
        let value = session.monitor_value(&processed);
        info!(
            %device_id,
            config_id = reading.config_id,
            timestamp = reading.timestamp,
            wavelength = session.monitor_wavelength(),
            value,
            "Spectrum"
        );

        reads += 1;
        if options.count.is_some_and(|n| reads >= n) {
            break;
        }
        if run_until_shutdown(shutdown.token(), tokio::time::sleep(interval))
            .await
            .is_none()
        {
            break;
        }
    }

    info!(reads, "Watch finished");
    Ok(())
}

/// Read one spectrum and export it, as absorbance when both references are given.
pub async fn capture(
    url: &str,
    device: Option<String>,
    output: &Path,
    dark: Option<&Path>,
    incident: Option<&Path>,
) -> Result<()> {
    let client = SpectrometerClient::new(url)?;
    let device_id = resolve_device(&client, device).await?;
    let config = client.get_config(&device_id).await?;
    let reading = client.read_spectrum(&device_id).await?;

    let mut session = AcquisitionSession::new(&config.coeffs, reading.data.len())?;
    match (dark, incident) {
        (Some(dark), Some(incident)) => {
            let dark = read_csv(dark).with_context(|| format!("Failed to read {:?}", dark))?;
            let incident =
                read_csv(incident).with_context(|| format!("Failed to read {:?}", incident))?;
            session.capture_dark(&dark.values)?;
            session.capture_incident(&incident.values)?;
            session.set_mode(DisplayMode::Absorbance);
        }
        (None, None) => {}
        _ => warn!("Absorbance needs both --dark and --incident; exporting raw counts"),
    }

    let processed = session.process(&reading.data)?;
    write_csv(output, session.wavelengths(), &processed, session.mode())?;

    println!(
        "[ok] {} ({} pixels, {}, config_id={}) -> {:?}",
        device_id,
        processed.len(),
        session.mode().label(),
        reading.config_id,
        output
    );
    Ok(())
}

async fn resolve_device(client: &SpectrometerClient, device: Option<String>) -> Result<String> {
    if let Some(device) = device {
        return Ok(device);
    }
    client
        .list_devices()
        .await?
        .into_iter()
        .next()
        .context("No spectrometers attached")
}

/// Size the wavelength axis from the device calibration and one read.
async fn open_session(client: &SpectrometerClient, device_id: &str) -> Result<AcquisitionSession> {
    let config = client.get_config(device_id).await?;
    let first = client.read_spectrum(device_id).await?;
    Ok(AcquisitionSession::new(&config.coeffs, first.data.len())?)
}
