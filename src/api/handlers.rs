//! HTTP endpoint handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::Json,
};
use tracing::{error, info};

use super::responses::{text, ApiError, HealthResponse, StatusResponse};
use crate::{
    services::format_time,
    state::AppState,
    tasks::StartOutcome,
};

/// Query parameters accepted by the timer endpoints
#[derive(Debug, Default)]
pub struct TimerQuery {
    pub project: Option<String>,
    pub minutes: Option<String>,
}

impl From<Vec<(String, String)>> for TimerQuery {
    /// Build from raw pairs; a repeated key keeps its first value
    fn from(pairs: Vec<(String, String)>) -> Self {
        let mut query = TimerQuery::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "project" => &mut query.project,
                "minutes" => &mut query.minutes,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        query
    }
}

impl TimerQuery {
    /// The project name, with an empty value treated as absent
    fn project(&self) -> Option<&str> {
        self.project.as_deref().filter(|p| !p.is_empty())
    }

    /// Whole minutes whose value in seconds still fits an `i64`
    fn minutes(&self) -> Option<i64> {
        self.minutes
            .as_deref()
            .and_then(|m| m.trim().parse::<i64>().ok())
            .filter(|m| m.checked_mul(60).is_some())
    }
}

/// Handle GET /start?project=<name> - Count a start and run the project's timer
pub async fn start_handler(
    State(state): State<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<String, ApiError> {
    let query = TimerQuery::from(pairs);
    let project = query.project().ok_or(ApiError::MissingProject)?;

    match state.registry.start(project).await {
        Ok(outcome) => {
            if outcome == StartOutcome::AlreadyRunning {
                info!("Start endpoint called for running project {}", project);
            }
            Ok(text(format!("Started timer for project: {}", project)))
        }
        Err(e) => {
            error!("Failed to start timer for {}: {}", project, e);
            Err(ApiError::Storage(e))
        }
    }
}

/// Handle GET /stop[?project=<name>] - Stop one timer, or every timer when no project is given
pub async fn stop_handler(
    State(state): State<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<String, ApiError> {
    let query = TimerQuery::from(pairs);
    match query.project() {
        Some(project) => {
            if state.registry.stop(project) {
                Ok(text(format!("Stopped timer for project: {}", project)))
            } else {
                Err(ApiError::NoActiveTimer(project.to_string()))
            }
        }
        None => {
            state.registry.stop_all();
            Ok(text("Stopped all timers."))
        }
    }
}

/// Handle GET /edit?project=<name>&minutes=<int> - Add or subtract minutes
pub async fn edit_handler(
    State(state): State<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<String, ApiError> {
    let query = TimerQuery::from(pairs);
    let (project, minutes) = match (query.project(), query.minutes()) {
        (Some(project), Some(minutes)) => (project, minutes),
        _ => return Err(ApiError::MissingEditParams),
    };

    match state.registry.edit_time(project, minutes).await {
        Ok(_) => Ok(text(format!("Edited time for project: {}", project))),
        Err(e) => {
            error!("Failed to edit time for {}: {}", project, e);
            Err(ApiError::Storage(e))
        }
    }
}

/// Handle GET /list - Log every project's total, sorted by name
pub async fn list_handler(State(state): State<Arc<AppState>>) -> String {
    for record in state.manager.list_all_or_empty().await {
        info!("{}: {}", record.project_name, record.readable_time);
    }
    text("Listed all projects in console.")
}

/// Handle GET /list-today - Log today's time per project and the total
pub async fn list_today_handler(State(state): State<Arc<AppState>>) -> String {
    let summary = state.manager.sum_today_or_empty().await;
    for (project, seconds) in &summary.projects {
        info!("{}: {}", project, format_time((*seconds).max(0) as u64));
    }
    info!(
        "Total time today: {}",
        format_time(summary.total_seconds.max(0) as u64)
    );
    text("Listed today's times in console.")
}

/// Handle GET /status - Running timers and server metadata
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        active_timers: state.registry.active_timers(),
        interval_seconds: state.registry.interval().as_secs(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

/// Any unrouted path
pub async fn not_found_handler() -> ApiError {
    ApiError::NotFound
}
