//! HTTP server implementation using Axum
//!
//! Every router served here gets `/health`, a JSON 404 fallback, per-route
//! request metrics and a tracing span per request.

use async_trait::async_trait;
use axum::extract::{MatchedPath, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use observability::RequestMetrics;
use parking_lot::RwLock;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::ServerConfig;
use crate::error::{Result, ServerError};
use crate::health::{health_routes, HealthState};
use crate::traits::Server;

/// HTTP server wrapping an Axum router.
///
/// # Example
///
/// ```ignore
/// use server::{HttpServer, ServerConfig, ServerExt};
///
/// let server = HttpServer::new(ServerConfig::default(), "specd", spectrometer_routes(state));
/// server.run_with_ctrl_c().await?;
/// ```
#[derive(Clone)]
pub struct HttpServer {
    name: String,
    config: ServerConfig,
    router: Router,
    running: Arc<AtomicBool>,
    bound_addr: Arc<RwLock<Option<SocketAddr>>>,
}

impl HttpServer {
    pub fn new(config: ServerConfig, name: &str, routes: Router) -> Self {
        Self {
            name: name.to_string(),
            config,
            router: app_router(name, routes),
            running: Arc::new(AtomicBool::new(false)),
            bound_addr: Arc::new(RwLock::new(None)),
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// The fully layered router (for testing or inspection)
    pub fn router(&self) -> &Router {
        &self.router
    }
}

/// Add the shared endpoints and layers to a service's routes.
pub fn app_router(service_name: &str, routes: Router) -> Router {
    let metrics = RequestMetrics::new(service_name);
    routes
        .merge(health_routes(Arc::new(HealthState::new(service_name))))
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(metrics, track_metrics))
        .layer(TraceLayer::new_for_http())
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" })))
}

async fn track_metrics(
    State(metrics): State<RequestMetrics>,
    request: Request,
    next: Next,
) -> Response {
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let start = Instant::now();

    let response = next.run(request).await;

    metrics.record_request(&route, start.elapsed(), response.status().as_u16());
    response
}

#[async_trait]
impl Server for HttpServer {
    fn name(&self) -> &str {
        &self.name
    }

    fn address(&self) -> Option<SocketAddr> {
        *self.bound_addr.read()
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    async fn run(&self, shutdown_token: CancellationToken) -> Result<()> {
        let addr = self.config.addr()?;

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| ServerError::bind(addr.to_string(), e))?;

        let local_addr = listener.local_addr().map_err(ServerError::Io)?;
        *self.bound_addr.write() = Some(local_addr);
        self.running.store(true, Ordering::SeqCst);

        info!(server = %self.name, %local_addr, "HTTP server listening");

        let result = axum::serve(listener, self.router.clone())
            .with_graceful_shutdown(async move {
                shutdown_token.cancelled().await;
                info!("HTTP server received shutdown signal");
            })
            .await;

        self.running.store(false, Ordering::SeqCst);
        *self.bound_addr.write() = None;

        match result {
            Ok(()) => {
                info!(server = %self.name, "HTTP server shutdown complete");
                Ok(())
            }
            Err(e) => {
                error!(%e, "HTTP server error");
                Err(ServerError::Io(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::ServerExt;
    use axum::body::{to_bytes, Body};
    use axum::routing::get;
    use std::time::Duration;
    use tower::ServiceExt;

    fn test_routes() -> Router {
        Router::new().route("/ping", get(|| async { "pong" }))
    }

    async fn call(router: &Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let request = axum::http::Request::builder()
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn test_router_serves_routes_and_health() {
        let server = HttpServer::new(ServerConfig::ephemeral(), "test", test_routes());

        let (status, body) = call(server.router(), "/ping").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"pong");

        let (status, body) = call(server.router(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        let health: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(health["status"], "ok");
        assert_eq!(health["service"], "test");
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let server = HttpServer::new(ServerConfig::ephemeral(), "test", test_routes());
        let (status, body) = call(server.router(), "/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, br#"{"error":"not found"}"#);
    }

    #[tokio::test]
    async fn test_http_server_binds_and_shuts_down() {
        let server = HttpServer::new(ServerConfig::ephemeral(), "test", test_routes());
        let probe = server.clone();
        let (handle, token) = server.spawn();

        let mut bound = None;
        for _ in 0..50 {
            if let Some(addr) = probe.address() {
                bound = Some(addr);
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        let addr = bound.expect("server should bind");
        assert_ne!(addr.port(), 0);
        assert!(probe.is_running());

        token.cancel();
        let result = tokio::time::timeout(Duration::from_secs(5), handle).await;
        assert!(matches!(result, Ok(Ok(Ok(())))));
        assert!(!probe.is_running());
    }
}
