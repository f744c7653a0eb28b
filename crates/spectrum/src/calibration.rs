//! Pixel to wavelength calibration.
//!
//! Devices report four coefficients `[c1, c2, c3, c4]`. The wavelength of
//! pixel `p` is `c1*p/2 + c2*p^2/4 + c3 + c4*p^3/8` (nm).

/// Wavelength in nm of a single pixel.
pub fn wavelength_at(coeffs: &[f64; 4], pixel: usize) -> f64 {
    let p = pixel as f64;
    let [c1, c2, c3, c4] = *coeffs;
    c1 * p / 2.0 + c2 * p * p / 4.0 + c3 + c4 * p * p * p / 8.0
}

/// Wavelength axis for a detector of `pixels` pixels.
pub fn wavelengths(coeffs: &[f64; 4], pixels: usize) -> Vec<f64> {
    (0..pixels).map(|p| wavelength_at(coeffs, p)).collect()
}

/// Round to a fixed number of decimals, as displayed to users.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_calibration() {
        // c1 = 1.0 -> 0.5 nm per pixel starting at c3
        let coeffs = [1.0, 0.0, 400.0, 0.0];
        assert_eq!(wavelength_at(&coeffs, 0), 400.0);
        assert_eq!(wavelength_at(&coeffs, 10), 405.0);
    }

    #[test]
    fn test_polynomial_terms() {
        let coeffs = [0.0, 1.0, 0.0, 1.0];
        // p = 2: 4/4 + 8/8 = 2
        assert_eq!(wavelength_at(&coeffs, 2), 2.0);
    }

    #[test]
    fn test_axis_is_monotonic_for_typical_coeffs() {
        let coeffs = [0.5, 1e-5, 280.0, -1e-9];
        let axis = wavelengths(&coeffs, 2048);
        assert_eq!(axis.len(), 2048);
        assert!(axis.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.23456, 2), 1.23);
        assert_eq!(round_to(-0.005, 1), -0.0);
    }
}
