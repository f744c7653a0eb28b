//! # Spectrum Crate
//!
//! Client-side processing for spectra read from a specd server.
//!
//! ## Key Components
//!
//! - **Calibration**: pixel index to wavelength using the device's 4 coefficients
//! - **Absorbance**: `log10((incident - dark) / (sample - dark))` against stored references
//! - **Display**: raw/absorbance mode, x window, y autoscale, monitored wavelength
//! - **Export**: CSV spectrum files (`# Wavelength (nm), Count` header)
//!
//! ```text
//!   GET /spectrum ──► raw counts ──► AcquisitionSession ──► processed trace
//!                                    │  References (dark, incident)
//!                                    │  DisplayMode (raw | absorbance)
//!                                    └► monitor value, autoscale, CSV
//! ```

pub mod absorbance;
pub mod calibration;
pub mod display;
pub mod error;
pub mod export;
pub mod session;

pub use absorbance::{absorbance, References};
pub use calibration::{wavelength_at, wavelengths};
pub use display::{autoscale, monitor_index, DisplayMode, XWindow, YRange};
pub use error::{SpectrumError, SpectrumResult};
pub use export::{read_csv, write_csv, ExportedSpectrum};
pub use session::AcquisitionSession;
