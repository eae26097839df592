//! HTTP + realtime interface
//!
//! REST routes for login, full dumps, and the week lock; one websocket
//! endpoint fanning every accepted mutation out to all connected viewers.

pub mod routes;
pub mod ws;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};

use crate::notify::Notifier;
use crate::store::Store;
use ws::FanoutHub;

/// State shared across handlers and websocket connections
pub struct AppState {
    pub store: RwLock<Store>,
    pub hub: FanoutHub,
    pub notifier: Notifier,
}

pub type SharedState = Arc<AppState>;

/// Create the application router
pub fn create_router(state: SharedState) -> Router {
    // Browser clients are served from elsewhere; allow any origin, like the
    // original deployment.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/login", post(routes::api_login))
        .route("/api/wash-entries", get(routes::api_wash_entries))
        .route("/api/weekly-actions", get(routes::api_weekly_actions))
        .route("/api/lock-week", post(routes::api_lock_week))
        .route("/ws", get(ws::ws_handler))
        .route("/health", get(routes::health))
        .layer(cors)
        .with_state(state)
}
