//! HTTP client for a running specd.
//!
//! Used by the `devices`, `watch` and `capture` commands. Error bodies are
//! decoded back into the server's message where possible.

use crate::api::models::{ConfigUpdateResponse, DeviceListResponse, ErrorResponse};
use crate::types::{ConfigUpdate, DeviceConfig, SpectrumReading};
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Device not found: {0}")]
    NotFound(String),

    /// The server answered 400.
    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Invalid base URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Client for the spectrometer endpoints.
#[derive(Debug, Clone)]
pub struct SpectrometerClient {
    client: Client,
    base_url: String,
    base: Url,
}

impl SpectrometerClient {
    pub fn new(base_url: &str) -> ClientResult<Self> {
        Self::with_timeout(base_url, Duration::from_secs(30))
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> ClientResult<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let invalid = |reason: String| ClientError::InvalidUrl {
            url: base_url.clone(),
            reason,
        };
        let base = Url::parse(&base_url).map_err(|e| invalid(e.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(invalid("not a hierarchical URL".to_string()));
        }

        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            base,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn list_devices(&self) -> ClientResult<Vec<String>> {
        let response = self.client.get(self.endpoint(&["spectrometers"])).send().await?;
        let body: DeviceListResponse = decode(response, None).await?;
        Ok(body.device_ids)
    }

    pub async fn get_config(&self, device_id: &str) -> ClientResult<DeviceConfig> {
        let url = self.endpoint(&["spectrometers", device_id, "config"]);
        let response = self.client.get(url).send().await?;
        decode(response, Some(device_id)).await
    }

    /// Apply a configuration change and return the assigned `config_id`.
    pub async fn set_config(&self, device_id: &str, update: &ConfigUpdate) -> ClientResult<u64> {
        let url = self.endpoint(&["spectrometers", device_id, "config"]);
        let response = self.client.put(url).json(update).send().await?;
        let body: ConfigUpdateResponse = decode(response, Some(device_id)).await?;
        Ok(body.config_id)
    }

    pub async fn read_spectrum(&self, device_id: &str) -> ClientResult<SpectrumReading> {
        let url = self.endpoint(&["spectrometers", device_id, "spectrum"]);
        let response = self.client.get(url).send().await?;
        decode(response, Some(device_id)).await
    }

    /// Whether `/health` answers with a success status.
    pub async fn health(&self) -> ClientResult<bool> {
        let response = self.client.get(self.endpoint(&["health"])).send().await?;
        Ok(response.status().is_success())
    }

    /// Append percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // cannot_be_a_base was rejected in with_timeout
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

/// Decode a success body, or map the status to a [`ClientError`].
///
/// A 404 names `device_id` when the request addressed one device.
async fn decode<T: DeserializeOwned>(
    response: Response,
    device_id: Option<&str>,
) -> ClientResult<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let message = match response.json::<ErrorResponse>().await {
        Ok(body) => body.error,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
    };

    Err(match (status, device_id) {
        (StatusCode::NOT_FOUND, Some(device_id)) => ClientError::NotFound(device_id.to_string()),
        (StatusCode::BAD_REQUEST, _) => ClientError::Rejected(message),
        _ => ClientError::Server {
            status: status.as_u16(),
            message,
        },
    })
}
