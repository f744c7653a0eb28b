//! Display state: mode, wavelength window, y autoscale and the monitored pixel.

use crate::calibration::round_to;
use crate::error::{SpectrumError, SpectrumResult};
use serde::{Deserialize, Serialize};

/// What a processed trace represents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    /// Raw detector counts.
    #[default]
    Raw,
    /// Absorbance against the stored references.
    Absorbance,
}

impl DisplayMode {
    pub fn toggled(self) -> Self {
        match self {
            DisplayMode::Raw => DisplayMode::Absorbance,
            DisplayMode::Absorbance => DisplayMode::Raw,
        }
    }

    /// Y axis label for this mode.
    pub fn label(self) -> &'static str {
        match self {
            DisplayMode::Raw => "Count",
            DisplayMode::Absorbance => "Absorbance",
        }
    }

    /// Fixed y range used when entering absorbance mode.
    pub fn default_y_range(self) -> Option<YRange> {
        match self {
            DisplayMode::Raw => None,
            DisplayMode::Absorbance => Some(YRange { min: -0.1, max: 1.2 }),
        }
    }
}

/// Vertical display range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YRange {
    pub min: f64,
    pub max: f64,
}

/// Visible wavelength window, bounded by the detector's limits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct XWindow {
    min: f64,
    max: f64,
    lower_limit: f64,
    upper_limit: f64,
}

impl XWindow {
    /// Full-range window over a wavelength axis.
    pub fn full(wavelengths: &[f64]) -> SpectrumResult<Self> {
        let (lower, upper) = min_max(wavelengths).ok_or(SpectrumError::Empty)?;
        let lower = round_to(lower, 3);
        let upper = round_to(upper, 3);
        Ok(Self {
            min: lower,
            max: upper,
            lower_limit: lower,
            upper_limit: upper,
        })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn limits(&self) -> (f64, f64) {
        (self.lower_limit, self.upper_limit)
    }

    /// Change both bounds at once. The new window must stay inside the
    /// detector limits and keep `min < max`.
    pub fn set(&mut self, min: f64, max: f64) -> SpectrumResult<()> {
        let valid = min.is_finite()
            && max.is_finite()
            && min < max
            && min >= self.lower_limit
            && max <= self.upper_limit;
        if !valid {
            return Err(SpectrumError::InvalidWindow {
                min,
                max,
                lower: self.lower_limit,
                upper: self.upper_limit,
            });
        }
        self.min = min;
        self.max = max;
        Ok(())
    }

    /// Pixel index range `[start, end)` covered by the window.
    pub fn pixel_range(&self, wavelengths: &[f64]) -> (usize, usize) {
        (
            search_sorted_left(wavelengths, self.min),
            search_sorted_left(wavelengths, self.max),
        )
    }
}

/// Y range fitted to the data inside the window: `min * 0.9 .. max * 1.1`.
///
/// Returns `None` when the window covers no pixels.
pub fn autoscale(wavelengths: &[f64], data: &[f64], window: &XWindow) -> Option<YRange> {
    let (start, end) = window.pixel_range(wavelengths);
    let end = end.min(data.len());
    if start >= end {
        return None;
    }
    let rounded: Vec<f64> = data[start..end].iter().map(|v| round_to(*v, 2)).collect();
    let (lo, hi) = min_max(&rounded)?;
    Some(YRange {
        min: round_to(lo * 0.9, 2),
        max: round_to(hi * 1.1, 2),
    })
}

/// Index of the first pixel whose wavelength is `>= target`.
///
/// The target must lie strictly inside the window.
pub fn monitor_index(wavelengths: &[f64], target: f64, window: &XWindow) -> SpectrumResult<usize> {
    if !(target > window.min() && target < window.max()) {
        return Err(SpectrumError::MonitorOutOfRange {
            wavelength: target,
            min: window.min(),
            max: window.max(),
        });
    }
    let index = search_sorted_left(wavelengths, target);
    Ok(index.min(wavelengths.len().saturating_sub(1)))
}

/// Median wavelength, the default monitor position.
pub fn median(wavelengths: &[f64]) -> Option<f64> {
    if wavelengths.is_empty() {
        return None;
    }
    let mut sorted = wavelengths.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// First index `i` with `sorted[i] >= value`.
fn search_sorted_left(sorted: &[f64], value: f64) -> usize {
    sorted.partition_point(|v| *v < value)
}

fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}
