//! Response bodies for the spectrometer endpoints.

use serde::{Deserialize, Serialize};

/// `GET /spectrometers`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceListResponse {
    pub device_ids: Vec<String>,
}

/// `PUT /spectrometers/{id}/config`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigUpdateResponse {
    /// Version assigned to the write.
    pub config_id: u64,
}

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
