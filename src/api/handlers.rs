//! HTTP API handlers.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::HabitError;
use crate::habits::{Completion, Habit, HabitPage, HabitStore, ListQuery, LogCompletion, NewHabit};
use crate::metrics::LatencyTimer;
use crate::utils::today_utc;

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// Habit storage.
    pub store: Arc<HabitStore>,
    /// Page size for list requests without a usable `limit`.
    pub default_page_limit: usize,
    /// Optional upper bound on the requested page size.
    pub max_page_limit: Option<usize>,
    /// Prometheus render handle, when a recorder is installed.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new app state around an empty store.
    pub fn new(config: &Config) -> Self {
        Self::with_store(Arc::new(HabitStore::new()), config)
    }

    /// Create app state around an existing store.
    pub fn with_store(store: Arc<HabitStore>, config: &Config) -> Self {
        Self {
            store,
            default_page_limit: config.default_page_limit,
            max_page_limit: config.max_page_limit,
            metrics: None,
        }
    }

    /// Attach the Prometheus handle served on `/metrics`.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status: "ok".
    pub status: &'static str,
}

/// Response to a successful create.
#[derive(Debug, Serialize)]
pub struct HabitCreatedResponse {
    #[serde(flatten)]
    pub habit: Habit,
    pub message: &'static str,
}

/// Response to a successful completion log.
#[derive(Debug, Serialize)]
pub struct CompletionLoggedResponse {
    #[serde(flatten)]
    pub completion: Completion,
    pub message: &'static str,
}

/// Health check handler - always returns 200.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// Prometheus exposition of the process metrics.
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            "metrics recorder not installed".to_string(),
        ),
    }
}

/// `POST /api/habits`
pub async fn create_habit(
    State(state): State<AppState>,
    payload: Result<Json<NewHabit>, JsonRejection>,
) -> Result<impl IntoResponse, HabitError> {
    let _timer = LatencyTimer::new("create_habit");

    let Json(new) = payload.map_err(|rejection| {
        debug!("Rejected create body: {}", rejection);
        HabitError::Validation("Missing required fields".to_string())
    })?;
    let habit = state.store.create(new).await?;

    Ok((
        StatusCode::CREATED,
        Json(HabitCreatedResponse {
            habit,
            message: "Habit created successfully.",
        }),
    ))
}

/// `GET /api/habits`
pub async fn list_habits(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<HabitPage>, HabitError> {
    let _timer = LatencyTimer::new("list_habits");

    let query = match query {
        Ok(Query(pairs)) => ListQuery::from_pairs(pairs),
        Err(rejection) => {
            warn!("Ignoring undecodable list query: {}", rejection);
            ListQuery::default()
        }
    };
    let filter = query.into_filter(state.default_page_limit, state.max_page_limit);
    let today = today_utc()?;

    Ok(Json(state.store.list(&filter, &today).await))
}

/// `POST /api/habits/:id/log`
pub async fn log_completion(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<LogCompletion>, JsonRejection>,
) -> Result<impl IntoResponse, HabitError> {
    let _timer = LatencyTimer::new("log_completion");

    let Json(request) = payload.map_err(|rejection| {
        debug!("Rejected log body: {}", rejection);
        HabitError::Validation("Invalid input data.".to_string())
    })?;
    let completion = state.store.log_completion(&id, request).await?;

    Ok((
        StatusCode::CREATED,
        Json(CompletionLoggedResponse {
            completion,
            message: "Completion logged successfully.",
        }),
    ))
}

/// `DELETE /api/habits/:id` - 204 with an empty body.
pub async fn delete_habit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, HabitError> {
    let _timer = LatencyTimer::new("delete_habit");

    state.store.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
