use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::telemetry::TelemetryError;
use crate::web::sessions::RegistryError;

pub enum ApiError {
    Validation(String),
    NotFound,
    Telemetry(TelemetryError),
}

impl From<RegistryError> for ApiError {
    fn from(e: RegistryError) -> Self {
        match e {
            RegistryError::NotFound(_) => ApiError::NotFound,
            RegistryError::Sync(e) => ApiError::Validation(e.to_string()),
            RegistryError::Telemetry(TelemetryError::NoData) => {
                ApiError::Validation(TelemetryError::NoData.to_string())
            }
            RegistryError::Telemetry(TelemetryError::Io(e))
                if e.kind() == std::io::ErrorKind::NotFound =>
            {
                ApiError::Validation(format!("telemetry file not found: {}", e))
            }
            RegistryError::Telemetry(e) => ApiError::Telemetry(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::with_message("validation_failed", &msg)),
            )
                .into_response(),
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new("session_not_found")),
            )
                .into_response(),
            ApiError::Telemetry(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::with_message("telemetry_error", &e.to_string())),
            )
                .into_response(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: &str) -> Self {
        ErrorResponse {
            error: error.to_string(),
            message: None,
        }
    }

    pub fn with_message(error: &str, message: &str) -> Self {
        ErrorResponse {
            error: error.to_string(),
            message: Some(message.to_string()),
        }
    }
}
