//! # HTTP Server
//!
//! Playground server combining the health, metrics and playground routers.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::config::HttpServerConfig;
use super::observability_routes::{health_routes, observability_routes};
use super::playground_routes::{playground_routes, PlaygroundState};
use crate::observability::Event;

pub struct HttpServer {
    config: HttpServerConfig,
    state: Arc<PlaygroundState>,
    router: Router,
}

impl HttpServer {
    pub fn new(config: HttpServerConfig, state: Arc<PlaygroundState>) -> Self {
        let router = Self::build_router(&config, state.clone());
        Self {
            config,
            state,
            router,
        }
    }

    fn build_router(config: &HttpServerConfig, state: Arc<PlaygroundState>) -> Router {
        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        Router::new()
            .merge(health_routes())
            .merge(observability_routes(state.metrics.clone()))
            .nest("/api", playground_routes(state))
            .layer(TraceLayer::new_for_http())
            .layer(cors)
    }

    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// The router, for tests
    pub fn router(self) -> Router {
        self.router
    }

    pub async fn start(self) -> Result<(), io::Error> {
        let addr: SocketAddr = self.config.socket_addr().parse().map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid socket address {}: {}", self.config.socket_addr(), e),
            )
        })?;

        let listener = TcpListener::bind(addr).await?;
        let bound = listener.local_addr()?.to_string();
        let logger = *self.state.pipeline.logger();
        logger.event(Event::Serving, &[("addr", bound.as_str())]);

        axum::serve(listener, self.router).await?;

        logger.event(Event::ServerStopped, &[("addr", bound.as_str())]);
        Ok(())
    }
}
