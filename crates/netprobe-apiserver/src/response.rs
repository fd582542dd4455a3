use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use netprobe_core::ProbeKind;
use netprobe_runtime::ProbeResult;
use serde::Serialize;
use uuid::Uuid;

/// API response wrapper
pub struct ApiResponse<T: Serialize> {
    status: StatusCode,
    body: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a new response with 200 OK
    pub fn ok(body: T) -> Self {
        Self {
            status: StatusCode::OK,
            body,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Wire form of a completed probe
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeResponse {
    pub request_id: Uuid,
    pub kind: ProbeKind,
    pub text: String,
    pub is_error: bool,
    pub duration_ms: u64,
    pub completed_at: DateTime<Utc>,
}

impl From<ProbeResult> for ProbeResponse {
    fn from(result: ProbeResult) -> Self {
        Self {
            request_id: result.request_id,
            kind: result.kind,
            text: result.outcome.text,
            is_error: result.outcome.is_error,
            duration_ms: u64::try_from(result.duration.as_millis()).unwrap_or(u64::MAX),
            completed_at: result.completed_at,
        }
    }
}
