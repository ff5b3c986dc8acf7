//! # Playground HTTP Server
//!
//! An axum server for trying schemas and layout specifications from a
//! browser or with curl.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/metrics` - Request and generation counters
//! - `/api/*` - Inference, validation, generation and the specification store

pub mod config;
pub mod observability_routes;
pub mod playground_routes;
pub mod server;

pub use config::HttpServerConfig;
pub use playground_routes::PlaygroundState;
pub use server::HttpServer;
