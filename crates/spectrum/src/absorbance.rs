//! Absorbance against dark and incident (100% T) references.

use crate::error::{SpectrumError, SpectrumResult};
use tracing::debug;

/// Reference spectra used for absorbance.
///
/// Until a reference is captured, dark is all zeros and incident is all ones
/// so that absorbance stays computable.
#[derive(Debug, Clone, PartialEq)]
pub struct References {
    dark: Vec<f64>,
    incident: Vec<f64>,
    dark_captured: bool,
    incident_captured: bool,
}

impl References {
    /// Placeholder references for a detector of `pixels` pixels.
    pub fn new(pixels: usize) -> Self {
        Self {
            dark: vec![0.0; pixels],
            incident: vec![1.0; pixels],
            dark_captured: false,
            incident_captured: false,
        }
    }

    /// Store a dark reading.
    pub fn set_dark(&mut self, dark: &[f64]) -> SpectrumResult<()> {
        check_len("dark", self.dark.len(), dark.len())?;
        self.dark = dark.to_vec();
        self.dark_captured = true;
        debug!(pixels = dark.len(), "Dark reference captured");
        Ok(())
    }

    /// Store an incident (100% T) reading.
    pub fn set_incident(&mut self, incident: &[f64]) -> SpectrumResult<()> {
        check_len("incident", self.incident.len(), incident.len())?;
        self.incident = incident.to_vec();
        self.incident_captured = true;
        debug!(pixels = incident.len(), "Incident reference captured");
        Ok(())
    }

    pub fn dark(&self) -> &[f64] {
        &self.dark
    }

    pub fn incident(&self) -> &[f64] {
        &self.incident
    }

    pub fn has_dark(&self) -> bool {
        self.dark_captured
    }

    pub fn has_incident(&self) -> bool {
        self.incident_captured
    }

    pub fn pixels(&self) -> usize {
        self.dark.len()
    }

    /// Absorbance of `sample` against these references.
    pub fn absorbance(&self, sample: &[f64]) -> SpectrumResult<Vec<f64>> {
        absorbance(sample, &self.dark, &self.incident)
    }
}

/// `log10((incident - dark) / (sample - dark))` per pixel.
///
/// Zero or negative ratios produce infinities or NaN; they are kept as-is so
/// a saturated or dark pixel does not abort the whole trace.
pub fn absorbance(sample: &[f64], dark: &[f64], incident: &[f64]) -> SpectrumResult<Vec<f64>> {
    check_len("dark", sample.len(), dark.len())?;
    check_len("incident", sample.len(), incident.len())?;

    Ok(sample
        .iter()
        .zip(dark)
        .zip(incident)
        .map(|((s, d), i)| ((i - d) / (s - d)).log10())
        .collect())
}

fn check_len(what: &'static str, expected: usize, actual: usize) -> SpectrumResult<()> {
    if expected != actual {
        return Err(SpectrumError::LengthMismatch {
            what,
            expected,
            actual,
        });
    }
    Ok(())
}
