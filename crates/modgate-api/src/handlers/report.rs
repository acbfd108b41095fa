use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use modgate_core::models::Violation;
use modgate_core::AppError;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

const MAX_WINDOW_DAYS: i64 = 365;

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    #[serde(default = "default_days")]
    days: i64,
}

fn default_days() -> i64 {
    7
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReportResponse {
    pub user_id: String,
    pub window_days: i64,
    pub violation_count: usize,
    pub violations: Vec<Violation>,
}

#[utoipa::path(
    get,
    path = "/api/v0/reports/{user_id}",
    tag = "reports",
    params(
        ("user_id" = String, Path, description = "User to report on"),
        ("days" = Option<i64>, Query, description = "Window size in days, default 7")
    ),
    responses(
        (status = 200, description = "Violation report", body = ReportResponse),
        (status = 400, description = "Invalid window", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(user_id = %user_id, days = query.days))]
pub async fn get_report(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<ReportResponse>, HttpAppError> {
    if query.days < 1 || query.days > MAX_WINDOW_DAYS {
        return Err(AppError::InvalidInput(format!(
            "days must be between 1 and {}",
            MAX_WINDOW_DAYS
        ))
        .into());
    }

    let since = Utc::now() - Duration::days(query.days);
    let violations = state.violations.query_violations(&user_id, since).await?;

    Ok(Json(ReportResponse {
        user_id,
        window_days: query.days,
        violation_count: violations.len(),
        violations,
    }))
}
