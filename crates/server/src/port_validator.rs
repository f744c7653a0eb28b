//! Port availability checks
//!
//! A successful check is advisory: another process can take the port before
//! the real bind. The bind in [`HttpServer::run`](crate::HttpServer) is the
//! source of truth.

use tokio::net::TcpListener;
use tracing::{debug, error, warn};

use crate::config::ServerConfig;
use crate::error::{Result, ServerError};

/// Fail early if the configured port is taken.
pub async fn validate_port_available(config: &ServerConfig) -> Result<()> {
    let addr = config.addr()?;
    debug!(%addr, "Checking port availability");

    match TcpListener::bind(addr).await {
        Ok(listener) => {
            drop(listener);
            Ok(())
        }
        Err(e) => {
            error!("Port {} is NOT available: {}", config.port, e);
            Err(ServerError::port_in_use(config.port, e.to_string()))
        }
    }
}

/// Reject port 0 for an explicit bind, warn on privileged ports.
pub fn validate_port_range(port: u16) -> Result<()> {
    if port == 0 {
        return Err(ServerError::InvalidPort(port));
    }
    if port < 1024 {
        warn!(
            "Port {} is a privileged port (requires root/admin privileges)",
            port
        );
    }
    Ok(())
}
