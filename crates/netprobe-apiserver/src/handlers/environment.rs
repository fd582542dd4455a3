use crate::response::ApiResponse;
use crate::AppState;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

/// GET /api/v1/environment
pub async fn get_environment(State(state): State<Arc<AppState>>) -> Response {
    ApiResponse::ok(state.environment.as_ref().clone()).into_response()
}
