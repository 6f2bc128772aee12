//! REST API for the playback service
//!
//! Session lifecycle, media-event reporting, stateless resolution, and
//! the SSE event feed consumed by the site UI.

pub mod handlers;
pub mod sse;

use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::player::PlayerEngine;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Session engine
    pub engine: Arc<PlayerEngine>,
    /// Server port
    pub port: u16,
}

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check (no prefix for health endpoint)
        .route("/health", get(handlers::health))
        // API v1 routes
        .nest(
            "/api/v1",
            Router::new()
                // Stateless resolution
                .route("/resolve", get(handlers::resolve))
                // Session lifecycle
                .route("/sessions", post(handlers::create_session))
                .route("/sessions/:session_id", get(handlers::get_session))
                .route("/sessions/:session_id", delete(handlers::delete_session))
                // Player-reported events and progress
                .route("/sessions/:session_id/events", post(handlers::media_event))
                .route("/sessions/:session_id/progress", post(handlers::progress))
                .route(
                    "/sessions/:session_id/reference",
                    post(handlers::replace_reference),
                )
                // SSE events
                .route("/events", get(sse::event_stream)),
        )
        // Request tracing and CORS for browser clients
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
