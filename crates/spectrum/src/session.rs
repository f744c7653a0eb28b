//! Client-side acquisition state.
//!
//! An [`AcquisitionSession`] holds everything a polling client needs between
//! two spectrum reads: the wavelength axis, dark/incident references, the
//! display mode, the visible window and the monitored pixel.

use crate::absorbance::References;
use crate::calibration::{round_to, wavelengths};
use crate::display::{self, DisplayMode, XWindow, YRange};
use crate::error::{SpectrumError, SpectrumResult};
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct AcquisitionSession {
    wavelengths: Vec<f64>,
    references: References,
    mode: DisplayMode,
    window: XWindow,
    monitor_index: usize,
    y_range: Option<YRange>,
}

impl AcquisitionSession {
    /// Build a session from the device's calibration coefficients.
    pub fn new(coeffs: &[f64; 4], pixels: usize) -> SpectrumResult<Self> {
        Self::from_wavelengths(wavelengths(coeffs, pixels))
    }

    /// Build a session from an explicit wavelength axis.
    ///
    /// The monitor starts at the median wavelength and the mode is raw.
    pub fn from_wavelengths(wavelengths: Vec<f64>) -> SpectrumResult<Self> {
        let wavelengths: Vec<f64> = wavelengths.into_iter().map(|w| round_to(w, 3)).collect();
        let window = XWindow::full(&wavelengths)?;
        let median = display::median(&wavelengths).ok_or(SpectrumError::Empty)?;
        let monitor_index = wavelengths
            .partition_point(|w| *w < median)
            .min(wavelengths.len() - 1);

        Ok(Self {
            references: References::new(wavelengths.len()),
            wavelengths,
            mode: DisplayMode::Raw,
            window,
            monitor_index,
            y_range: None,
        })
    }

    pub fn wavelengths(&self) -> &[f64] {
        &self.wavelengths
    }

    pub fn pixels(&self) -> usize {
        self.wavelengths.len()
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn references(&self) -> &References {
        &self.references
    }

    pub fn window(&self) -> &XWindow {
        &self.window
    }

    pub fn y_range(&self) -> Option<YRange> {
        self.y_range
    }

    /// Switch between raw and absorbance.
    ///
    /// Entering absorbance pins the y range to `-0.1..1.2`; leaving it clears
    /// the range so the next raw trace is autoscaled.
    pub fn toggle_mode(&mut self) -> DisplayMode {
        self.mode = self.mode.toggled();
        self.y_range = self.mode.default_y_range();
        info!(mode = self.mode.label(), "Display mode changed");
        self.mode
    }

    pub fn set_mode(&mut self, mode: DisplayMode) {
        if self.mode != mode {
            self.toggle_mode();
        }
    }

    pub fn capture_dark(&mut self, raw: &[f64]) -> SpectrumResult<()> {
        self.references.set_dark(raw)
    }

    pub fn capture_incident(&mut self, raw: &[f64]) -> SpectrumResult<()> {
        self.references.set_incident(raw)
    }

    /// Change the visible window. Rejected windows leave the old one in place.
    pub fn set_window(&mut self, min: f64, max: f64) -> SpectrumResult<()> {
        self.window.set(min, max)?;
        debug!(min, max, "Wavelength window updated");
        Ok(())
    }

    /// Wavelength of the monitored pixel.
    pub fn monitor_wavelength(&self) -> f64 {
        round_to(self.wavelengths[self.monitor_index], 2)
    }

    /// Move the monitor to the first pixel at or above `target` nm.
    ///
    /// Returns the wavelength actually monitored.
    pub fn set_monitor(&mut self, target: f64) -> SpectrumResult<f64> {
        self.monitor_index = display::monitor_index(&self.wavelengths, target, &self.window)?;
        let actual = self.monitor_wavelength();
        debug!(target, actual, index = self.monitor_index, "Monitor wavelength set");
        Ok(actual)
    }

    /// Turn a raw reading into the trace for the current mode.
    pub fn process(&self, raw: &[f64]) -> SpectrumResult<Vec<f64>> {
        if raw.len() != self.pixels() {
            return Err(SpectrumError::LengthMismatch {
                what: "reading",
                expected: self.pixels(),
                actual: raw.len(),
            });
        }
        match self.mode {
            DisplayMode::Raw => Ok(raw.to_vec()),
            DisplayMode::Absorbance => self.references.absorbance(raw),
        }
    }

    /// Monitored value of a processed trace, rounded to 3 decimals.
    pub fn monitor_value(&self, processed: &[f64]) -> Option<f64> {
        processed
            .get(self.monitor_index)
            .map(|v| round_to(*v, 3))
    }

    /// Fit the y range to a raw reading. Has no effect in absorbance mode.
    pub fn autoscale(&mut self, raw: &[f64]) -> Option<YRange> {
        if self.mode != DisplayMode::Raw {
            return self.y_range;
        }
        if let Some(range) = display::autoscale(&self.wavelengths, raw, &self.window) {
            self.y_range = Some(range);
        }
        self.y_range
    }
}
