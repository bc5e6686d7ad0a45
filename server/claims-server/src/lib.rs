//! Claims Server - claim intake HTTP API
//!
//! Routes:
//!
//! - `POST /claim_process`: validate and store a batch of claims
//! - `GET /claims/:uid`: read back a committed claim
//! - `GET /health`: liveness plus a claim store check

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;

// Re-export commonly used types
pub use config::ServerConfig;
pub use error::*;
pub use server::ClaimsServer;

use axum::{extract::DefaultBodyLimit, middleware::from_fn, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Create the main application router with all routes and middleware
pub fn create_app(server: ClaimsServer) -> Router {
    let http = &server.config.server;

    routes::create_routes()
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::create_cors_layer(&http.cors_allowed_origins))
                .layer(from_fn(middleware::request_timing_middleware))
                .layer(DefaultBodyLimit::max(http.max_body_bytes)),
        )
        .with_state(server)
}
