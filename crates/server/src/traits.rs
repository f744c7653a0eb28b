//! Server lifecycle traits
//!
//! [`Server`] is the one method every listener implements; [`ServerExt`]
//! layers the spawn and Ctrl+C conveniences on top.

use async_trait::async_trait;
use std::net::SocketAddr;
use tokio_util::sync::CancellationToken;

use crate::error::Result;

/// A long-running listener with cooperative shutdown.
///
/// # Example
///
/// ```ignore
/// use server::{HttpServer, ServerConfig, ServerExt};
///
/// let server = HttpServer::new(ServerConfig::default(), "specd", routes);
/// server.run_with_ctrl_c().await?;
/// ```
#[async_trait]
pub trait Server: Send + Sync + 'static {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Bound address while running.
    fn address(&self) -> Option<SocketAddr>;

    fn is_running(&self) -> bool;

    /// Serve until `shutdown` is cancelled, then drain in-flight requests.
    ///
    /// # Errors
    ///
    /// Fails if the address cannot be bound or the accept loop dies.
    async fn run(&self, shutdown: CancellationToken) -> Result<()>;
}

/// Convenience methods for every [`Server`].
pub trait ServerExt: Server + Sized {
    /// Run on a new task. Cancel the returned token to stop it.
    fn spawn(self) -> (tokio::task::JoinHandle<Result<()>>, CancellationToken) {
        let token = CancellationToken::new();
        let token_clone = token.clone();
        let handle = tokio::spawn(async move { self.run(token_clone).await });
        (handle, token)
    }

    /// Run until Ctrl+C or SIGTERM.
    fn run_with_ctrl_c(self) -> impl std::future::Future<Output = Result<()>> + Send {
        async move {
            let shutdown = crate::shutdown::ShutdownController::with_signals();
            self.run(shutdown.token()).await
        }
    }
}

impl<T: Server + Sized> ServerExt for T {}
