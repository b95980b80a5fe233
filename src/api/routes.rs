//! HTTP API route definitions.

use std::any::Any;

use axum::{
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Router,
};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use super::handlers::{
    create_habit, delete_habit, health, list_habits, log_completion, metrics, AppState,
};
use crate::error::HabitError;

/// Create the full application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        // Habit API
        .nest("/api", habit_routes())
        .with_state(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
}

/// Habit routes, mounted under `/api`.
fn habit_routes() -> Router<AppState> {
    Router::new()
        .route("/habits", get(list_habits).post(create_habit))
        .route("/habits/:id/log", post(log_completion))
        .route("/habits/:id", delete(delete_habit))
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic".to_string()
    };

    HabitError::Internal(detail).into_response()
}
