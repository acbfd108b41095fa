//! Route configuration.

use std::sync::Arc;

use anyhow::Result;
use axum::{
    http::{HeaderValue, Method},
    routing::{get, post, put},
    Json, Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use modgate_core::Config;

use crate::api_doc::ApiDoc;
use crate::handlers;
use crate::state::AppState;

pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>> {
    let cors = setup_cors(config)?;

    // Multipart bodies can exceed the audio limit (file analysis accepts
    // larger documents); cap the request body above the largest gate so
    // oversized uploads still reach the size-gate response path.
    let body_limit = RequestBodyLimitLayer::new(2 * config.stream_max_buffer_bytes);

    let router = Router::new()
        .route("/health", get(handlers::health::health))
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .route(
            "/api/v0/analyze/text",
            post(handlers::analyze_text::analyze_text),
        )
        .route(
            "/api/v0/analyze/audio",
            post(handlers::analyze_audio::analyze_audio),
        )
        .route(
            "/api/v0/analyze/file",
            post(handlers::analyze_file::analyze_file),
        )
        .route(
            "/api/v0/reports/{user_id}",
            get(handlers::report::get_report),
        )
        .route(
            "/api/v0/admin/threshold",
            put(handlers::admin::put_threshold).get(handlers::admin::get_threshold),
        )
        .route("/ws/audio", get(handlers::stream::ws_audio))
        .layer(TraceLayer::new_for_http())
        .layer(body_limit)
        .layer(cors)
        .with_state(state);

    Ok(router)
}

fn setup_cors(config: &Config) -> Result<CorsLayer> {
    let cors = if config.cors_origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::PUT])
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()?;
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::PUT])
            .allow_headers(Any)
    };
    Ok(cors)
}
