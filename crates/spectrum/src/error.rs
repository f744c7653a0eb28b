//! Error types for the spectrum crate.

use thiserror::Error;

/// Result type alias for spectrum processing.
pub type SpectrumResult<T> = Result<T, SpectrumError>;

/// Errors that can occur while processing or exporting spectra.
#[derive(Error, Debug)]
pub enum SpectrumError {
    /// Two arrays that must be pixel-aligned have different lengths.
    #[error("Length mismatch: {what} has {actual} pixels, expected {expected}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// The spectrum has no pixels.
    #[error("Spectrum is empty")]
    Empty,

    /// The requested x window is outside the detector range or inverted.
    #[error("Invalid wavelength window: min = {min} nm, max = {max} nm (limits {lower} to {upper} nm)")]
    InvalidWindow {
        min: f64,
        max: f64,
        lower: f64,
        upper: f64,
    },

    /// The monitored wavelength is not inside the current window.
    #[error("Monitored wavelength {wavelength} nm must be within {min} to {max} nm")]
    MonitorOutOfRange { wavelength: f64, min: f64, max: f64 },

    /// CSV read/write failure.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A CSV row could not be interpreted.
    #[error("Malformed spectrum file at line {line}: {message}")]
    Malformed { line: usize, message: String },
}
