//! HTTP facade over the device registry.
//!
//! ## Modules
//!
//! - `handlers` - Axum handlers and the error-to-status mapping
//! - `routes` - Router construction
//! - `models` - Response bodies

pub mod handlers;
pub mod models;
pub mod routes;

pub use handlers::SpectrometerApiState;
pub use routes::spectrometer_routes;
