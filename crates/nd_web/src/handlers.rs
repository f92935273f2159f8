use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use nd_core::Error;
use serde_json::json;
use tracing::error;

use crate::AppState;

/// Maps pipeline errors onto the failure body callers expect.
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!("Request failed: {}", self.0);
        let body = json!({
            "message": "failure",
            "error": self.0.to_string(),
        });
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

pub async fn run_pipeline(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let response = state.pipeline.run(Utc::now()).await?;
    let status = StatusCode::from_u16(response.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    Ok((status, Json(response)).into_response())
}

pub async fn latest_insight(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    match state.insights.latest_insight().await? {
        Some(insight) => Ok(Json(insight).into_response()),
        None => Ok((StatusCode::NOT_FOUND, Json(json!({ "message": "no insight stored yet" }))).into_response()),
    }
}
