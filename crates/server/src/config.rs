//! Server configuration

use crate::error::{Result, ServerError};
use std::net::SocketAddr;

/// Port the service listens on unless configured otherwise.
pub const DEFAULT_PORT: u16 = 5000;

/// Bind configuration for the HTTP server.
///
/// # Example
///
/// ```
/// use server::config::ServerConfig;
///
/// let config = ServerConfig::new("127.0.0.1", 5000);
/// assert_eq!(config.addr().unwrap().port(), 5000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host to bind to (e.g., "0.0.0.0" or "127.0.0.1")
    pub host: String,
    /// Port to bind to; 0 picks an ephemeral port
    pub port: u16,
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Loopback on an ephemeral port, for tests.
    pub fn ephemeral() -> Self {
        Self::new("127.0.0.1", 0)
    }

    /// Parse the socket address to bind.
    pub fn addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ServerError::InvalidAddress(format!("{}:{}", self.host, self.port)))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new("0.0.0.0", DEFAULT_PORT)
    }
}
