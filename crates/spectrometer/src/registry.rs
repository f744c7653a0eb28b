//! Process-wide device registry.
//!
//! Devices are enumerated on first use and the result is kept for the life
//! of the process. Each entry carries a configuration version that starts at
//! zero and is bumped after every successful configuration write.

use crate::device::{Spectrometer, SpectrometerDriver};
use crate::error::{SpectrometerError, SpectrometerResult};
use crate::types::{ConfigUpdate, DeviceConfig, SpectrumReading};
use chrono::Utc;
use metrics::{counter, gauge};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::OnceCell;

/// A discovered device and its configuration version.
pub struct RegistryEntry {
    handle: Arc<dyn Spectrometer>,
    config_version: AtomicU64,
}

impl RegistryEntry {
    fn new(handle: Arc<dyn Spectrometer>) -> Self {
        Self {
            handle,
            config_version: AtomicU64::new(0),
        }
    }

    pub fn handle(&self) -> &Arc<dyn Spectrometer> {
        &self.handle
    }

    pub fn config_version(&self) -> u64 {
        self.config_version.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for RegistryEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryEntry")
            .field("device_id", &self.handle.device_id())
            .field("config_version", &self.config_version())
            .finish()
    }
}

/// Lazily populated map of `device_id -> RegistryEntry`.
///
/// Enumeration runs at most once successfully, even under concurrent first
/// requests. A failed enumeration is not cached; the next call retries.
pub struct DeviceRegistry {
    driver: Arc<dyn SpectrometerDriver>,
    entries: OnceCell<BTreeMap<String, RegistryEntry>>,
}

impl DeviceRegistry {
    pub fn new(driver: Arc<dyn SpectrometerDriver>) -> Self {
        Self {
            driver,
            entries: OnceCell::new(),
        }
    }

    /// Whether enumeration has completed.
    pub fn is_initialized(&self) -> bool {
        self.entries.initialized()
    }

    async fn entries(&self) -> SpectrometerResult<&BTreeMap<String, RegistryEntry>> {
        self.entries
            .get_or_try_init(|| async {
                let devices = self.driver.find_devices().await.map_err(|e| {
                    tracing::error!(driver = self.driver.name(), error = %e, "Device enumeration failed");
                    e
                })?;

                let mut entries = BTreeMap::new();
                for device in devices {
                    let device_id = device.device_id().to_string();
                    if entries
                        .insert(device_id.clone(), RegistryEntry::new(device))
                        .is_some()
                    {
                        tracing::warn!(%device_id, "Duplicate device id, keeping the last one");
                    }
                }

                gauge!("spectrometer_devices").set(entries.len() as f64);
                tracing::info!(
                    driver = self.driver.name(),
                    count = entries.len(),
                    devices = ?entries.keys().collect::<Vec<_>>(),
                    "Enumerated spectrometers"
                );
                Ok(entries)
            })
            .await
    }

    /// All known device ids, sorted.
    pub async fn list_device_ids(&self) -> SpectrometerResult<Vec<String>> {
        Ok(self.entries().await?.keys().cloned().collect())
    }

    pub async fn lookup(&self, device_id: &str) -> SpectrometerResult<&RegistryEntry> {
        self.entries()
            .await?
            .get(device_id)
            .ok_or_else(|| SpectrometerError::NotFound(device_id.to_string()))
    }

    pub async fn get_config(&self, device_id: &str) -> SpectrometerResult<DeviceConfig> {
        let entry = self.lookup(device_id).await?;
        entry.handle.get_config().await
    }

    /// Apply `update` and return the new configuration version.
    ///
    /// The version only moves when the device accepts the write.
    pub async fn update_config(
        &self,
        device_id: &str,
        update: &ConfigUpdate,
    ) -> SpectrometerResult<u64> {
        let entry = self.lookup(device_id).await?;

        if let Err(e) = entry.handle.set_config(update).await {
            if matches!(e, SpectrometerError::OutOfRange(_)) {
                counter!("spectrometer_config_rejections_total", "device_id" => device_id.to_string())
                    .increment(1);
            }
            tracing::warn!(%device_id, error = %e, "Configuration rejected");
            return Err(e);
        }

        let version = entry.config_version.fetch_add(1, Ordering::SeqCst) + 1;
        counter!("spectrometer_config_updates_total", "device_id" => device_id.to_string())
            .increment(1);
        tracing::info!(%device_id, config_id = version, ?update, "Configuration updated");
        Ok(version)
    }

    /// Read one spectrum, stamped with the capture time and the current
    /// configuration version.
    pub async fn read_spectrum(&self, device_id: &str) -> SpectrometerResult<SpectrumReading> {
        let entry = self.lookup(device_id).await?;

        let data = entry.handle.read_spectrum().await?;
        let timestamp = Utc::now().timestamp_millis();
        let config_id = entry.config_version();

        counter!("spectrometer_spectrum_reads_total", "device_id" => device_id.to_string())
            .increment(1);
        tracing::debug!(%device_id, pixels = data.len(), config_id, "Spectrum read");

        Ok(SpectrumReading {
            data,
            timestamp,
            config_id,
        })
    }
}

impl std::fmt::Debug for DeviceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceRegistry")
            .field("driver", &self.driver.name())
            .field("entries", &self.entries.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulated::{SimulatedDriver, SimulatedSpectrometer};

    fn registry_with(ids: &[&str]) -> (Arc<SimulatedDriver>, DeviceRegistry) {
        let driver = Arc::new(SimulatedDriver::new(
            ids.iter().map(|id| SimulatedSpectrometer::named(*id)).collect(),
        ));
        let registry = DeviceRegistry::new(driver.clone());
        (driver, registry)
    }

    #[tokio::test]
    async fn test_lazy_enumeration() {
        let (driver, registry) = registry_with(&["SN2", "SN1"]);
        assert!(!registry.is_initialized());
        assert_eq!(driver.enumerations(), 0);

        assert_eq!(registry.list_device_ids().await.unwrap(), vec!["SN1", "SN2"]);
        assert!(registry.is_initialized());

        registry.list_device_ids().await.unwrap();
        registry.get_config("SN1").await.unwrap();
        assert_eq!(driver.enumerations(), 1);
    }

    #[tokio::test]
    async fn test_failed_enumeration_is_retried() {
        let (driver, registry) = registry_with(&["SN1"]);
        driver.fail_next_enumerations(1);

        assert!(matches!(
            registry.list_device_ids().await,
            Err(SpectrometerError::Enumeration(_))
        ));
        assert!(!registry.is_initialized());
        assert_eq!(registry.list_device_ids().await.unwrap(), vec!["SN1"]);
        assert_eq!(driver.enumerations(), 2);
    }

    #[tokio::test]
    async fn test_empty_enumeration_is_cached() {
        let (driver, registry) = registry_with(&[]);
        assert!(registry.list_device_ids().await.unwrap().is_empty());
        assert!(registry.list_device_ids().await.unwrap().is_empty());
        assert_eq!(driver.enumerations(), 1);
    }

    #[tokio::test]
    async fn test_version_tracks_successful_writes() {
        let (_, registry) = registry_with(&["SN1"]);
        let ok = ConfigUpdate::default().with_int_time(50);
        let bad = ConfigUpdate::default().with_int_time(1);

        assert_eq!(registry.update_config("SN1", &ok).await.unwrap(), 1);
        assert!(registry.update_config("SN1", &bad).await.is_err());
        assert_eq!(registry.lookup("SN1").await.unwrap().config_version(), 1);
        assert_eq!(registry.update_config("SN1", &ok).await.unwrap(), 2);
        assert_eq!(registry.read_spectrum("SN1").await.unwrap().config_id, 2);
    }

    #[tokio::test]
    async fn test_versions_are_per_device() {
        let (_, registry) = registry_with(&["A", "B"]);
        registry
            .update_config("A", &ConfigUpdate::default())
            .await
            .unwrap();
        assert_eq!(registry.read_spectrum("A").await.unwrap().config_id, 1);
        assert_eq!(registry.read_spectrum("B").await.unwrap().config_id, 0);
    }

    #[tokio::test]
    async fn test_unknown_device() {
        let (_, registry) = registry_with(&["SN1"]);
        assert_eq!(
            registry.read_spectrum("nope").await.unwrap_err(),
            SpectrometerError::NotFound("nope".to_string())
        );
    }

    #[tokio::test]
    async fn test_concurrent_first_use_enumerates_once() {
        let (driver, registry) = registry_with(&["SN1"]);
        let registry = Arc::new(registry);
        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let registry = registry.clone();
                tokio::spawn(async move { registry.list_device_ids().await })
            })
            .collect();
        for task in tasks {
            assert_eq!(task.await.unwrap().unwrap(), vec!["SN1"]);
        }
        assert_eq!(driver.enumerations(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_writes_get_distinct_versions() {
        let (_, registry) = registry_with(&["SN1"]);
        let registry = Arc::new(registry);
        let tasks: Vec<_> = (0..10)
            .map(|i| {
                let registry = registry.clone();
                tokio::spawn(async move {
                    registry
                        .update_config("SN1", &ConfigUpdate::default().with_int_time(10 + i))
                        .await
                })
            })
            .collect();
        let mut versions = Vec::new();
        for task in tasks {
            versions.push(task.await.unwrap().unwrap());
        }
        versions.sort_unstable();
        assert_eq!(versions, (1..=10).collect::<Vec<u64>>());
    }
}
