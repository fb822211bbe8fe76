//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/start", get(start_handler))
        .route("/stop", get(stop_handler))
        .route("/edit", get(edit_handler))
        .route("/list", get(list_handler))
        .route("/list-today", get(list_today_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .fallback(not_found_handler)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
