//! # Spectrometer Crate
//!
//! Device access for specd: a driver seam for enumerating spectrometers, a
//! process-wide registry that caches the enumeration and versions
//! configuration writes, and the HTTP facade over that registry.
//!
//! ## Key Components
//!
//! - **Traits**: `Spectrometer` for one device, `SpectrometerDriver` for enumeration
//! - **Registry**: `DeviceRegistry`, lazily populated on first use
//! - **Simulated backend**: `SimulatedDriver` for development and tests
//! - **HTTP API** (feature `api`): `/spectrometers` routes
//! - **Client** (feature `client`): `SpectrometerClient` for a running server
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     HTTP facade (api)                       │
//! │  GET /spectrometers                                         │
//! │  GET|PUT /spectrometers/:id/config                          │
//! │  GET /spectrometers/:id/spectrum                            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      DeviceRegistry                         │
//! │  device_id -> { handle, config_version }                    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │              SpectrometerDriver (external)                  │
//! │  SimulatedDriver │ vendor SDK bindings │ etc.               │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod device;
pub mod error;
pub mod registry;
pub mod simulated;
pub mod types;

#[cfg(feature = "api")]
pub mod api;

#[cfg(feature = "client")]
pub mod client;

// Re-export main types for convenience
pub use device::{Spectrometer, SpectrometerDriver};
pub use error::{SpectrometerError, SpectrometerResult};
pub use registry::{DeviceRegistry, RegistryEntry};
pub use simulated::{SimulatedDriver, SimulatedSpectrometer};
pub use types::{limits, ConfigUpdate, DeviceConfig, ParameterRange, SpectrumReading};

#[cfg(feature = "api")]
pub use api::{spectrometer_routes, SpectrometerApiState};

#[cfg(feature = "client")]
pub use client::{ClientError, ClientResult, SpectrometerClient};
