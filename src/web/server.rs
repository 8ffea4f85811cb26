use axum::{routing::delete, routing::get, routing::post, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::api::sessions as session_handlers;
use super::api_doc::ApiDoc;
use super::config::Config;
use super::sessions::SessionRegistry;

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<SessionRegistry>,
}

pub async fn run_server(config: Config) -> std::io::Result<()> {
    let bind_addr = config.web.bind.clone();
    let registry = SessionRegistry::new(config.telemetry.base_folder.clone());

    let state = AppState {
        registry: Arc::new(registry),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/api/sessions", post(session_handlers::create_session))
        .route("/api/sessions", get(session_handlers::list_sessions))
        .route("/api/sessions/{id}", get(session_handlers::get_session))
        .route(
            "/api/sessions/{id}",
            delete(session_handlers::delete_session),
        )
        .route(
            "/api/sessions/{id}/query",
            post(session_handlers::query_session),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    log::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await
}
