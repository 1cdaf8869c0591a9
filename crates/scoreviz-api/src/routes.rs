use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use scoreviz_core::{PipelineRequest, PipelineResult, WorkerError};

use crate::AppState;

pub async fn run_pipeline(
    State(app_state): State<Arc<AppState>>,
    Json(request): Json<PipelineRequest>,
) -> Result<Json<PipelineResult>, StatusCode> {
    app_state
        .pipeline_state
        .run(request)
        .await
        .map(Json)
        .map_err(|err| {
            tracing::error!("pipeline failed: {err}");
            match err {
                WorkerError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
                WorkerError::Stopped | WorkerError::Closed => StatusCode::SERVICE_UNAVAILABLE,
            }
        })
}

pub async fn health() -> &'static str {
    "ok"
}
