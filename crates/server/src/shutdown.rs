//! Graceful shutdown on Ctrl+C or SIGTERM

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Owns the root cancellation token for the process.
///
/// # Example
///
/// ```ignore
/// let shutdown = ShutdownController::with_signals();
/// let reading = run_until_shutdown(shutdown.token(), client.read_spectrum(id)).await;
/// ```
#[derive(Clone, Default)]
pub struct ShutdownController {
    token: CancellationToken,
}

impl ShutdownController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel the token on the first Ctrl+C (or SIGTERM on Unix).
    pub fn with_signals() -> Self {
        let controller = Self::new();
        let token = controller.token.clone();

        tokio::spawn(async move {
            wait_for_signal().await;
            token.cancel();
        });

        controller
    }

    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn shutdown(&self) {
        info!("Manual shutdown triggered");
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

async fn wait_for_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, initiating graceful shutdown..."),
        _ = terminate => info!("Received SIGTERM, initiating graceful shutdown..."),
    }
}

/// Run `future` unless shutdown comes first.
pub async fn run_until_shutdown<F, T>(token: CancellationToken, future: F) -> Option<T>
where
    F: std::future::Future<Output = T>,
{
    tokio::select! {
        result = future => Some(result),
        _ = token.cancelled() => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_manual_shutdown_cancels_handed_out_tokens() {
        let controller = ShutdownController::new();
        let token = controller.token();
        assert!(!token.is_cancelled());

        controller.shutdown();

        assert!(controller.is_cancelled());
        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn test_run_until_shutdown() {
        let token = CancellationToken::new();
        assert_eq!(run_until_shutdown(token.clone(), async { 7 }).await, Some(7));

        token.cancel();
        let result = run_until_shutdown(token, async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            7
        })
        .await;
        assert_eq!(result, None);
    }
}
