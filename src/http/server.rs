//! HTTP server setup.
//!
//! # Responsibilities
//! - Mount the routing tree in an axum application
//! - Wire up middleware (tracing, request timeout)
//! - Apply validated route tables as they arrive
//! - Serve until shutdown is signalled

use std::time::Duration;

use axum::http::StatusCode;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::{build_router, ConfigError, HandlerRegistry, RouterConfig};
use crate::http::service::SharedRouter;

/// HTTP server that answers every request through a routing tree.
pub struct HttpServer {
    app: axum::Router,
    router: SharedRouter,
    registry: HandlerRegistry,
}

impl HttpServer {
    /// Build the routing tree for `config`. Route table errors abort here.
    pub fn new(config: &RouterConfig, registry: HandlerRegistry) -> Result<Self, ConfigError> {
        let router = SharedRouter::new(build_router(config, &registry)?);
        let app = Self::build_app(config, router.clone());
        Ok(Self {
            app,
            router,
            registry,
        })
    }

    fn build_app(config: &RouterConfig, router: SharedRouter) -> axum::Router {
        axum::Router::new()
            .fallback_service(router)
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                Duration::from_secs(config.server.request_timeout_secs),
            ))
            .layer(TraceLayer::new_for_http())
    }

    /// The tree currently serving requests.
    pub fn router(&self) -> &SharedRouter {
        &self.router
    }

    /// Run the server until `shutdown` fires.
    ///
    /// Route tables received on `config_updates` replace the tree; a table
    /// that fails to build is logged and the current tree stays in place.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<RouterConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let router = self.router.clone();
        let registry = self.registry;
        tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                match build_router(&config, &registry) {
                    Ok(tree) => router.replace(tree),
                    Err(e) => {
                        tracing::warn!(error = %e, "Rejected route table update, keeping current tree")
                    }
                }
            }
        });

        axum::serve(listener, self.app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
