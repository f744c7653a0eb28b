//! Axum route definitions for the spectrometer API.

use crate::api::handlers::{self, SpectrometerApiState};
use axum::routing::get;
use axum::Router;
use std::sync::Arc;

/// Create all spectrometer routes.
///
/// # Routes
///
/// - `GET /spectrometers` - List device ids
/// - `GET /spectrometers/:device_id/config` - Current device configuration
/// - `PUT /spectrometers/:device_id/config` - Apply a configuration change
/// - `GET /spectrometers/:device_id/spectrum` - Read one spectrum
pub fn spectrometer_routes(state: Arc<SpectrometerApiState>) -> Router {
    Router::new()
        .route("/spectrometers", get(handlers::list_devices))
        .route(
            "/spectrometers/:device_id/config",
            get(handlers::get_config).put(handlers::put_config),
        )
        .route(
            "/spectrometers/:device_id/spectrum",
            get(handlers::get_spectrum),
        )
        .with_state(state)
}
