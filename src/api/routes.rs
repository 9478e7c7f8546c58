//! API Route Configuration

use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers::{self, AppState};
use super::middleware::{cors_middleware, logging_middleware};

/// Create the API router with all routes and middleware
pub fn create_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/bounties", get(handlers::list_bounties))
        .route("/bounties/", get(handlers::list_bounties))
        .route("/bounties/:id", get(handlers::get_bounty))
        .route("/bounties/:id/applications", get(handlers::list_applications))
        .route("/leaderboard", get(handlers::leaderboard))
        .route("/user/:address/bounties", get(handlers::user_bounties))
        .route("/user/:address/applications", get(handlers::user_applications));

    Router::new()
        .nest("/api", api)
        .route("/health", get(handlers::health_check))
        .fallback(handlers::not_found)
        .with_state(state)
        // Middleware (order matters - bottom runs first)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(cors_middleware))
}
