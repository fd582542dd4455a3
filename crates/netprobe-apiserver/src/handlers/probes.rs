use crate::response::{ApiResponse, ProbeResponse};
use crate::{AppState, Result};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use netprobe_core::ProbeRequest;
use std::sync::Arc;
use tracing::info;

/// POST /api/v1/probes
pub async fn run_probe(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<ProbeRequest>, JsonRejection>,
) -> Result<Response> {
    let Json(request) = payload?;

    info!("Running {} probe", request.kind());

    let result = state.handler.handle(&request).await;

    Ok(ApiResponse::ok(ProbeResponse::from(result)).into_response())
}
