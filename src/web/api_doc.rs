use utoipa::OpenApi;

use super::api::error::ErrorResponse;
use super::api::sessions::{CreateSessionRequest, QueryRequest, QueryResponse};
use super::sessions::SessionEntry;

#[derive(OpenApi)]
#[openapi(
    paths(
        super::api::sessions::create_session,
        super::api::sessions::list_sessions,
        super::api::sessions::get_session,
        super::api::sessions::delete_session,
        super::api::sessions::query_session,
    ),
    components(
        schemas(
            CreateSessionRequest,
            QueryRequest,
            QueryResponse,
            SessionEntry,
            ErrorResponse,
        )
    ),
    info(
        title = "Telesync Session API",
        description = "API for telemetry clock-synchronization sessions",
        version = "0.1.0"
    ),
    tags(
        (name = "sessions", description = "Calibrated telemetry sessions")
    )
)]
pub struct ApiDoc;
