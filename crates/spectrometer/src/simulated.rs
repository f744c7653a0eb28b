//! Simulated spectrometer backend.
//!
//! Each device renders a dark baseline plus Gaussian emission peaks on its
//! calibrated wavelength axis. Peak heights scale with integration time,
//! noise shrinks with `sqrt(scans_to_avg)`, and `x_smooth` selects a boxcar
//! width. Noise is derived from a per-device read counter, so a fresh device
//! always produces the same sequence of spectra.

use crate::device::{Spectrometer, SpectrometerDriver};
use crate::error::{SpectrometerError, SpectrometerResult};
use crate::types::{limits, ConfigUpdate, DeviceConfig};
use async_trait::async_trait;
use config::{DriverConfig, PeakConfig, SimulatedDeviceConfig};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;

/// Integration time at which configured peak heights apply.
const REFERENCE_INT_TIME_MS: f64 = 100.0;

/// Detector saturation.
const MAX_COUNTS: f64 = 65535.0;

/// Boxcar width per `x_smooth` level.
const SMOOTHING_WINDOWS: [usize; 5] = [1, 5, 9, 17, 33];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Settings {
    int_time: u32,
    scans_to_avg: u32,
    x_smooth: u8,
    x_timing: u8,
    temp_comp: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            int_time: 100,
            scans_to_avg: 1,
            x_smooth: 0,
            x_timing: 1,
            temp_comp: false,
        }
    }
}

impl Settings {
    /// Validate every field first so a rejected update leaves nothing applied.
    fn merged(&self, update: &ConfigUpdate) -> SpectrometerResult<Self> {
        let mut next = *self;
        if let Some(v) = update.int_time {
            next.int_time = limits::INT_TIME_MS.check(v)? as u32;
        }
        if let Some(v) = update.scans_to_avg {
            next.scans_to_avg = limits::SCANS_TO_AVG.check(v)? as u32;
        }
        if let Some(v) = update.x_smooth {
            next.x_smooth = limits::X_SMOOTH.check(v)? as u8;
        }
        if let Some(v) = update.x_timing {
            next.x_timing = limits::X_TIMING.check(v)? as u8;
        }
        if let Some(v) = update.temp_comp {
            next.temp_comp = v;
        }
        Ok(next)
    }
}

/// A synthetic device.
pub struct SimulatedSpectrometer {
    device_id: String,
    model: String,
    coeffs: [f64; 4],
    dark_level: f64,
    noise: f64,
    peaks: Vec<PeakConfig>,
    wavelengths: Vec<f64>,
    seed: u64,
    settings: Mutex<Settings>,
    reads: AtomicU64,
    connected: AtomicBool,
}

impl SimulatedSpectrometer {
    pub fn from_config(config: &SimulatedDeviceConfig) -> Self {
        Self {
            device_id: config.device_id.clone(),
            model: config.model.clone(),
            coeffs: config.coeffs,
            dark_level: config.dark_level,
            noise: config.noise,
            peaks: config.peaks.clone(),
            wavelengths: spectrum::wavelengths(&config.coeffs, config.pixels),
            seed: seed_for(&config.device_id),
            settings: Mutex::new(Settings::default()),
            reads: AtomicU64::new(0),
            connected: AtomicBool::new(true),
        }
    }

    /// A device with default calibration, no peaks and no noise.
    pub fn named(device_id: impl Into<String>) -> Self {
        Self::from_config(&SimulatedDeviceConfig {
            device_id: device_id.into(),
            model: config::default_model(),
            pixels: config::default_pixels(),
            coeffs: config::default_coeffs(),
            dark_level: config::default_dark_level(),
            noise: 0.0,
            peaks: Vec::new(),
        })
    }

    pub fn pixels(&self) -> usize {
        self.wavelengths.len()
    }

    /// Simulate the device being unplugged. Every later call fails.
    pub fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
        tracing::warn!(device_id = %self.device_id, "Simulated device disconnected");
    }

    pub fn reconnect(&self) {
        self.connected.store(true, Ordering::SeqCst);
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn ensure_connected(&self) -> SpectrometerResult<()> {
        if self.is_connected() {
            Ok(())
        } else {
            Err(SpectrometerError::Disconnected(self.device_id.clone()))
        }
    }

    fn render(&self, settings: Settings, read: u64) -> Vec<f64> {
        let gain = settings.int_time as f64 / REFERENCE_INT_TIME_MS;
        let noise = self.noise / (settings.scans_to_avg as f64).sqrt();

        let raw: Vec<f64> = self
            .wavelengths
            .iter()
            .enumerate()
            .map(|(pixel, &wl)| {
                let signal: f64 = self
                    .peaks
                    .iter()
                    .map(|peak| peak_response(peak, wl))
                    .sum::<f64>()
                    * gain;
                let jitter = unit_noise(self.seed, read, pixel as u64) * noise;
                self.dark_level + signal + jitter
            })
            .collect();

        let window = SMOOTHING_WINDOWS[settings.x_smooth as usize];
        boxcar(&raw, window)
            .into_iter()
            .map(|v| v.clamp(0.0, MAX_COUNTS))
            .collect()
    }
}

impl std::fmt::Debug for SimulatedSpectrometer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulatedSpectrometer")
            .field("device_id", &self.device_id)
            .field("model", &self.model)
            .field("pixels", &self.pixels())
            .field("connected", &self.is_connected())
            .finish()
    }
}

#[async_trait]
impl Spectrometer for SimulatedSpectrometer {
    fn device_id(&self) -> &str {
        &self.device_id
    }

    async fn get_config(&self) -> SpectrometerResult<DeviceConfig> {
        self.ensure_connected()?;
        let settings = *self.settings.lock();
        Ok(DeviceConfig {
            device_id: self.device_id.clone(),
            model: self.model.clone(),
            coeffs: self.coeffs,
            int_time: settings.int_time,
            scans_to_avg: settings.scans_to_avg,
            x_smooth: settings.x_smooth,
            x_timing: settings.x_timing,
            temp_comp: settings.temp_comp,
        })
    }

    async fn set_config(&self, update: &ConfigUpdate) -> SpectrometerResult<()> {
        self.ensure_connected()?;
        let mut settings = self.settings.lock();
        *settings = settings.merged(update)?;
        tracing::debug!(device_id = %self.device_id, ?settings, "Applied configuration");
        Ok(())
    }

    async fn read_spectrum(&self) -> SpectrometerResult<Vec<f64>> {
        self.ensure_connected()?;
        let settings = *self.settings.lock();
        let read = self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.render(settings, read))
    }
}

/// Driver over a fixed set of simulated devices.
#[derive(Debug, Default)]
pub struct SimulatedDriver {
    devices: Vec<Arc<SimulatedSpectrometer>>,
    enumerations: AtomicU32,
    pending_failures: AtomicU32,
}

impl SimulatedDriver {
    pub fn new(devices: Vec<SimulatedSpectrometer>) -> Self {
        Self {
            devices: devices.into_iter().map(Arc::new).collect(),
            enumerations: AtomicU32::new(0),
            pending_failures: AtomicU32::new(0),
        }
    }

    pub fn from_config(config: &DriverConfig) -> Self {
        Self::new(
            config
                .devices
                .iter()
                .map(SimulatedSpectrometer::from_config)
                .collect(),
        )
    }

    /// A concrete handle to one of the driver's devices.
    pub fn device(&self, device_id: &str) -> Option<Arc<SimulatedSpectrometer>> {
        self.devices
            .iter()
            .find(|d| d.device_id == device_id)
            .cloned()
    }

    /// Make the next `count` enumerations fail.
    pub fn fail_next_enumerations(&self, count: u32) {
        self.pending_failures.store(count, Ordering::SeqCst);
    }

    /// Number of enumeration attempts so far, failed ones included.
    pub fn enumerations(&self) -> u32 {
        self.enumerations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpectrometerDriver for SimulatedDriver {
    fn name(&self) -> &str {
        "simulated"
    }

    async fn find_devices(&self) -> SpectrometerResult<Vec<Arc<dyn Spectrometer>>> {
        self.enumerations.fetch_add(1, Ordering::SeqCst);

        let failing = self
            .pending_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(SpectrometerError::Enumeration(
                "simulated USB enumeration failure".to_string(),
            ));
        }

        Ok(self
            .devices
            .iter()
            .map(|d| Arc::clone(d) as Arc<dyn Spectrometer>)
            .collect())
    }
}

fn peak_response(peak: &PeakConfig, wavelength: f64) -> f64 {
    if peak.width_nm <= 0.0 {
        return 0.0;
    }
    let z = (wavelength - peak.center_nm) / peak.width_nm;
    peak.height * (-0.5 * z * z).exp()
}

/// Centered moving average, window shrinking at the edges.
fn boxcar(values: &[f64], window: usize) -> Vec<f64> {
    if window <= 1 || values.is_empty() {
        return values.to_vec();
    }
    let half = window / 2;
    (0..values.len())
        .map(|i| {
            let lo = i.saturating_sub(half);
            let hi = (i + half + 1).min(values.len());
            values[lo..hi].iter().sum::<f64>() / (hi - lo) as f64
        })
        .collect()
}

/// FNV-1a over the device id.
fn seed_for(device_id: &str) -> u64 {
    device_id.bytes().fold(0xcbf2_9ce4_8422_2325, |hash, b| {
        (hash ^ b as u64).wrapping_mul(0x0000_0100_0000_01b3)
    })
}

/// Deterministic value in [-1, 1) for (seed, read, pixel), via splitmix64.
fn unit_noise(seed: u64, read: u64, pixel: u64) -> f64 {
    let mut z = seed
        .wrapping_add(read.wrapping_mul(0x9e37_79b9_7f4a_7c15))
        .wrapping_add(pixel.wrapping_mul(0xbf58_476d_1ce4_e5b9));
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^= z >> 31;
    (z >> 11) as f64 / (1u64 << 52) as f64 - 1.0
}
