use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// API error type
///
/// Only request decoding and routing produce these. A probe that fails is
/// still a successful API call whose outcome carries the failure.
#[derive(Debug)]
pub enum ApiError {
    /// Route not found (404)
    NotFound(String),

    /// Malformed body (400)
    BadRequest(String),

    /// Well-formed JSON of the wrong shape (422)
    ValidationFailed(String),

    /// Body is not JSON (415)
    UnsupportedMediaType(String),
}

/// Result type for API operations
pub type Result<T> = std::result::Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::ValidationFailed(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::UnsupportedMediaType(msg) => (StatusCode::UNSUPPORTED_MEDIA_TYPE, msg),
        };

        let body = Json(json!({
            "kind": "Status",
            "status": "Failure",
            "message": message,
            "code": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::MissingJsonContentType(e) => ApiError::UnsupportedMediaType(e.body_text()),
            JsonRejection::JsonDataError(e) => ApiError::ValidationFailed(e.body_text()),
            other => ApiError::BadRequest(other.body_text()),
        }
    }
}
