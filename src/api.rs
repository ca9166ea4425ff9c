// HTTP API over the triage desk

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use serde_json::json;
use tracing::warn;

use crate::desk::{QueueStats, Submission, TriageDesk, TriageOutcome};
use crate::error::TriageError;
use crate::store::QueueEntry;

/// Create the application router
pub fn create_router(desk: Arc<TriageDesk>) -> Router {
    Router::new()
        .route("/api/triage", post(submit_report))
        .route("/api/queue", get(list_queue).delete(clear_queue))
        .route("/api/stats", get(get_stats))
        .route("/health", get(health_check))
        .with_state(desk)
}

impl IntoResponse for TriageError {
    fn into_response(self) -> Response {
        let status = match &self {
            TriageError::EmptyMessage => StatusCode::BAD_REQUEST,
            TriageError::Store(e) => {
                warn!("Store failure: {e:#}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[derive(Serialize)]
struct ClearResponse {
    success: bool,
}

/// POST /api/triage
async fn submit_report(
    State(desk): State<Arc<TriageDesk>>,
    Json(submission): Json<Submission>,
) -> Result<Json<TriageOutcome>, TriageError> {
    desk.submit(submission).map(Json)
}

/// GET /api/queue
async fn list_queue(
    State(desk): State<Arc<TriageDesk>>,
) -> Result<Json<Vec<QueueEntry>>, TriageError> {
    desk.queue().map(Json)
}

/// DELETE /api/queue
async fn clear_queue(
    State(desk): State<Arc<TriageDesk>>,
) -> Result<Json<ClearResponse>, TriageError> {
    desk.clear()?;
    Ok(Json(ClearResponse { success: true }))
}

/// GET /api/stats
async fn get_stats(State(desk): State<Arc<TriageDesk>>) -> Result<Json<QueueStats>, TriageError> {
    desk.stats().map(Json)
}

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
