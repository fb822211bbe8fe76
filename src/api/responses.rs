//! API response structures

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{error::StoreError, state::ActiveTimer};

/// Request failures and the plain-text reply each one produces
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing 'project' parameter")]
    MissingProject,
    #[error("Missing 'project' or 'minutes' parameter")]
    MissingEditParams,
    #[error("No active timer found for project: {0}")]
    NoActiveTimer(String),
    #[error("Storage error")]
    Storage(#[from] StoreError),
    #[error("Not found")]
    NotFound,
}

impl ApiError {
    /// HTTP status for this failure
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingProject | ApiError::MissingEditParams | ApiError::NoActiveTimer(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), format!("{}\n", self)).into_response()
    }
}

/// Plain-text success reply, newline terminated
pub fn text(message: impl std::fmt::Display) -> String {
    format!("{}\n", message)
}

/// Status response listing running timers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub active_timers: Vec<ActiveTimer>,
    pub interval_seconds: u64,
    pub uptime: String,
    pub port: u16,
    pub host: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
