use crate::{
    handlers::{claims, health},
    server::ClaimsServer,
};
use axum::{
    routing::{get, post},
    Router,
};

/// Create health check routes
pub fn health_routes() -> Router<ClaimsServer> {
    Router::new().route("/health", get(health::health_check))
}

/// Create claim intake routes
pub fn claim_routes() -> Router<ClaimsServer> {
    Router::new()
        .route("/claim_process", post(claims::claim_process))
        .route("/claims/:uid", get(claims::get_claim))
}

/// Create all application routes
pub fn create_routes() -> Router<ClaimsServer> {
    Router::new().merge(health_routes()).merge(claim_routes())
}
