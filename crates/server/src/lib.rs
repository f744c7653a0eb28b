//! Server infrastructure for specd
//!
//! This crate runs an Axum router with lifecycle management and graceful
//! shutdown. Routers served through [`HttpServer`] also get `/health`, a JSON
//! 404 fallback, per-route request metrics and request tracing.
//!
//! # Quick Start
//!
//! ```ignore
//! use server::{HttpServer, ServerConfig, ServerExt};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let server = HttpServer::new(ServerConfig::default(), "specd", routes);
//!     server.run_with_ctrl_c().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! - [`config`] - Bind address and default port
//! - [`traits`] - `Server` and `ServerExt` traits
//! - [`http`] - HTTP server using Axum
//! - [`health`] - Health check endpoint
//! - [`shutdown`] - Signal handling
//! - [`port_validator`] - Early port checks

pub mod config;
pub mod error;
pub mod health;
pub mod http;
pub mod port_validator;
pub mod shutdown;
pub mod traits;

pub use config::{ServerConfig, DEFAULT_PORT};
pub use error::{Result, ServerError};
pub use health::{HealthState, HealthStatus};
pub use http::{app_router, HttpServer};
pub use port_validator::{validate_port_available, validate_port_range};
pub use shutdown::{run_until_shutdown, ShutdownController};
pub use traits::{Server, ServerExt};
