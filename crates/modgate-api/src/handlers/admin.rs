use std::sync::Arc;

use axum::{
    extract::State,
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use modgate_core::AppError;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

const ADMIN_KEY_HEADER: &str = "x-admin-key";

#[derive(Debug, Deserialize, ToSchema)]
pub struct ThresholdRequest {
    pub threshold: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ThresholdResponse {
    pub threshold: f64,
}

#[utoipa::path(
    put,
    path = "/api/v0/admin/threshold",
    tag = "admin",
    request_body = ThresholdRequest,
    params(
        ("X-Admin-Key" = String, Header, description = "Admin API key")
    ),
    responses(
        (status = 200, description = "Threshold updated", body = ThresholdResponse),
        (status = 400, description = "Invalid threshold", body = ErrorResponse),
        (status = 401, description = "Missing or wrong admin key", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, headers, request))]
pub async fn put_threshold(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<ThresholdRequest>,
) -> Result<Json<ThresholdResponse>, HttpAppError> {
    check_admin_key(&state, &headers)?;

    if !(0.0..=1.0).contains(&request.threshold) {
        return Err(
            AppError::InvalidInput("threshold must be within [0, 1]".to_string()).into(),
        );
    }

    let previous = state.threshold.get();
    state.threshold.set(request.threshold);
    tracing::info!(
        previous,
        threshold = request.threshold,
        "Violation threshold updated"
    );

    Ok(Json(ThresholdResponse {
        threshold: state.threshold.get(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/v0/admin/threshold",
    tag = "admin",
    params(
        ("X-Admin-Key" = String, Header, description = "Admin API key")
    ),
    responses(
        (status = 200, description = "Active threshold", body = ThresholdResponse),
        (status = 401, description = "Missing or wrong admin key", body = ErrorResponse)
    )
)]
pub async fn get_threshold(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<ThresholdResponse>, HttpAppError> {
    check_admin_key(&state, &headers)?;
    Ok(Json(ThresholdResponse {
        threshold: state.threshold.get(),
    }))
}

fn check_admin_key(state: &AppState, headers: &HeaderMap) -> Result<(), HttpAppError> {
    let expected = state
        .config
        .admin_api_key
        .as_deref()
        .ok_or_else(|| AppError::Unauthorized("admin API is disabled".to_string()))?;

    let provided = headers
        .get(ADMIN_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("missing admin key".to_string()))?;

    if provided != expected {
        return Err(AppError::Unauthorized("invalid admin key".to_string()).into());
    }
    Ok(())
}
