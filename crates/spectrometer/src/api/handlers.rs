//! HTTP request handlers for the spectrometer API.

use crate::api::models::*;
use crate::error::SpectrometerError;
use crate::registry::DeviceRegistry;
use crate::types::{ConfigUpdate, DeviceConfig, SpectrumReading};
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use std::sync::Arc;

/// Shared state for spectrometer handlers.
pub struct SpectrometerApiState {
    pub registry: Arc<DeviceRegistry>,
}

impl SpectrometerApiState {
    pub fn new(registry: Arc<DeviceRegistry>) -> Self {
        Self { registry }
    }
}

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ErrorResponse>)>;

/// Map a registry error onto a status code and `{"error": ...}` body.
pub fn api_error(err: SpectrometerError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match &err {
        SpectrometerError::NotFound(_) => StatusCode::NOT_FOUND,
        SpectrometerError::InvalidBody(_) | SpectrometerError::OutOfRange(_) => {
            StatusCode::BAD_REQUEST
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        tracing::error!(error = %err, "Spectrometer request failed");
    }
    (status, Json(ErrorResponse::new(err.to_string())))
}

/// GET /spectrometers
pub async fn list_devices(
    State(state): State<Arc<SpectrometerApiState>>,
) -> ApiResult<DeviceListResponse> {
    let device_ids = state.registry.list_device_ids().await.map_err(api_error)?;
    Ok(Json(DeviceListResponse { device_ids }))
}

/// GET /spectrometers/{id}/config
pub async fn get_config(
    State(state): State<Arc<SpectrometerApiState>>,
    Path(device_id): Path<String>,
) -> ApiResult<DeviceConfig> {
    let config = state
        .registry
        .get_config(&device_id)
        .await
        .map_err(api_error)?;
    Ok(Json(config))
}

/// PUT /spectrometers/{id}/config
///
/// The body is parsed after the device lookup, so an unknown id reports 404
/// even when the body is malformed.
pub async fn put_config(
    State(state): State<Arc<SpectrometerApiState>>,
    Path(device_id): Path<String>,
    body: Bytes,
) -> ApiResult<ConfigUpdateResponse> {
    state.registry.lookup(&device_id).await.map_err(api_error)?;

    let update = ConfigUpdate::from_json_slice(&body).map_err(|e| {
        if let SpectrometerError::InvalidBody(detail) = &e {
            tracing::debug!(%device_id, %detail, "Unparsable configuration body");
        }
        api_error(e)
    })?;

    let config_id = state
        .registry
        .update_config(&device_id, &update)
        .await
        .map_err(api_error)?;
    Ok(Json(ConfigUpdateResponse { config_id }))
}

/// GET /spectrometers/{id}/spectrum
pub async fn get_spectrum(
    State(state): State<Arc<SpectrometerApiState>>,
    Path(device_id): Path<String>,
) -> ApiResult<SpectrumReading> {
    let reading = state
        .registry
        .read_spectrum(&device_id)
        .await
        .map_err(api_error)?;
    Ok(Json(reading))
}
