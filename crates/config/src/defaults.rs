pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

pub fn default_port() -> u16 {
    5000
}

pub fn default_model() -> String {
    "BLACK-Comet".to_string()
}

pub fn default_pixels() -> usize {
    2048
}

/// Roughly 280-900 nm across 2048 pixels.
pub fn default_coeffs() -> [f64; 4] {
    [0.62, -1.2e-5, 280.0, 0.0]
}

pub fn default_dark_level() -> f64 {
    800.0
}

pub fn default_noise() -> f64 {
    15.0
}

pub fn default_log_format() -> String {
    "pretty".to_string()
}

pub fn default_metrics_port() -> u16 {
    9100
}

/// Supported values for `logging.format`.
pub const LOG_FORMATS: [&str; 3] = ["pretty", "json", "compact"];
