//! Device and driver seams.
//!
//! A `SpectrometerDriver` enumerates attached hardware once; each device it
//! finds is exposed as a shared `Spectrometer` handle. Backends (the built-in
//! simulator, or a vendor SDK binding) implement both traits externally to
//! the registry.

use crate::error::SpectrometerResult;
use crate::types::{ConfigUpdate, DeviceConfig};
use async_trait::async_trait;
use std::sync::Arc;

/// A single attached spectrometer.
///
/// Implementations must be safe to call concurrently; the registry does not
/// serialize access to a device.
///
/// # Example
///
/// ```ignore
/// use spectrometer::{ConfigUpdate, Spectrometer};
///
/// async fn example(device: &dyn Spectrometer) {
///     device.set_config(&ConfigUpdate::default().with_int_time(50)).await?;
///     let counts = device.read_spectrum().await?;
///     println!("{} pixels from {}", counts.len(), device.device_id());
/// }
/// ```
#[async_trait]
pub trait Spectrometer: Send + Sync {
    /// Stable identifier, unique within one enumeration.
    fn device_id(&self) -> &str;

    /// Read the device's current configuration.
    async fn get_config(&self) -> SpectrometerResult<DeviceConfig>;

    /// Apply a configuration change.
    ///
    /// A rejected value must surface as `SpectrometerError::OutOfRange` and
    /// leave the device unchanged.
    async fn set_config(&self, update: &ConfigUpdate) -> SpectrometerResult<()>;

    /// Acquire one full detector read.
    async fn read_spectrum(&self) -> SpectrometerResult<Vec<f64>>;
}

/// Hardware enumeration.
#[async_trait]
pub trait SpectrometerDriver: Send + Sync {
    /// Backend name used in logs.
    fn name(&self) -> &str;

    /// Discover attached devices.
    async fn find_devices(&self) -> SpectrometerResult<Vec<Arc<dyn Spectrometer>>>;
}
