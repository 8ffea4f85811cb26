use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::sync::QueryResult;
use crate::web::api::error::{ApiResult, ErrorResponse};
use crate::web::server::AppState;
use crate::web::sessions::SessionEntry;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSessionRequest {
    /// Telemetry file name, resolved under the configured base folder.
    pub telemetry: String,
    /// Recording-relative anchor, `HH:MM:SS,mmm`.
    pub anchor: String,
    /// Detection-clock timestamp matching the anchor.
    pub detection_time: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct QueryRequest {
    pub detection_time: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct QueryResponse {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_m: i32,
    /// Matched record's telemetry-clock timestamp.
    pub timestamp: NaiveDateTime,
    /// Query time translated into the telemetry clock's frame.
    pub corrected: NaiveDateTime,
    /// Signed gap between the matched record and the corrected query time.
    pub residual_ms: f64,
}

impl From<QueryResult> for QueryResponse {
    fn from(result: QueryResult) -> Self {
        QueryResponse {
            latitude_deg: result.record.latitude_deg,
            longitude_deg: result.record.longitude_deg,
            altitude_m: result.record.altitude_m,
            timestamp: result.record.timestamp,
            corrected: result.corrected,
            residual_ms: round2(result.residual_ms()),
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[utoipa::path(
    post,
    path = "/api/sessions",
    tag = "sessions",
    request_body = CreateSessionRequest,
    responses(
        (status = 201, description = "Session calibrated", body = SessionEntry),
        (status = 400, description = "Validation error", body = ErrorResponse)
    )
)]
pub async fn create_session(
    State(state): State<AppState>,
    Json(request): Json<CreateSessionRequest>,
) -> ApiResult<impl IntoResponse> {
    let entry = state.registry.create(
        &request.telemetry,
        &request.anchor,
        &request.detection_time,
    )?;

    Ok((StatusCode::CREATED, Json(entry)))
}

#[utoipa::path(
    get,
    path = "/api/sessions",
    tag = "sessions",
    responses(
        (status = 200, description = "Active sessions", body = Vec<SessionEntry>)
    )
)]
pub async fn list_sessions(State(state): State<AppState>) -> Json<Vec<SessionEntry>> {
    Json(state.registry.list())
}

#[utoipa::path(
    get,
    path = "/api/sessions/{id}",
    tag = "sessions",
    params(("id" = String, Path, description = "Session id")),
    responses(
        (status = 200, description = "Session summary", body = SessionEntry),
        (status = 404, description = "Unknown session", body = ErrorResponse)
    )
)]
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SessionEntry>> {
    let entry = state.registry.get(&id)?;
    Ok(Json(entry))
}

#[utoipa::path(
    delete,
    path = "/api/sessions/{id}",
    tag = "sessions",
    params(("id" = String, Path, description = "Session id")),
    responses(
        (status = 204, description = "Session dropped"),
        (status = 404, description = "Unknown session", body = ErrorResponse)
    )
)]
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.registry.delete(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/sessions/{id}/query",
    tag = "sessions",
    params(("id" = String, Path, description = "Session id")),
    request_body = QueryRequest,
    responses(
        (status = 200, description = "Nearest record at the corrected time", body = QueryResponse),
        (status = 400, description = "Malformed timestamp", body = ErrorResponse),
        (status = 404, description = "Unknown session", body = ErrorResponse)
    )
)]
pub async fn query_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<QueryRequest>,
) -> ApiResult<Json<QueryResponse>> {
    let result = state.registry.query(&id, &request.detection_time)?;
    Ok(Json(result.into()))
}
