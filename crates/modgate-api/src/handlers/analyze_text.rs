use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use modgate_core::models::ContentType;
use modgate_core::AppError;
use modgate_services::moderation::combine_scores;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AnalyzeTextRequest {
    pub text: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AnalyzeTextResponse {
    /// Combined toxicity on the wire scale: [0, 1], 0.5 when unavailable,
    /// -1 when the judge answered non-numerically.
    pub toxicity_score: f32,
    pub score_state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub violation_recorded: bool,
}

#[utoipa::path(
    post,
    path = "/api/v0/analyze/text",
    tag = "analyze",
    request_body = AnalyzeTextRequest,
    responses(
        (status = 200, description = "Text analyzed", body = AnalyzeTextResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(
    text_len = request.text.len(),
    user_id = ?request.user_id
))]
pub async fn analyze_text(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnalyzeTextRequest>,
) -> Result<Json<AnalyzeTextResponse>, HttpAppError> {
    if request.text.trim().is_empty() {
        return Err(AppError::InvalidInput("text must not be empty".to_string()).into());
    }

    let scores = state.text_scorer.score_text(&request.text).await;
    let combined = combine_scores(scores.local, scores.remote);

    let violation_recorded = match &request.user_id {
        Some(user_id) => {
            state
                .gate
                .maybe_record(user_id, ContentType::Text, &request.text, combined)
                .await
        }
        None => false,
    };

    Ok(Json(AnalyzeTextResponse {
        toxicity_score: combined.wire_value(),
        score_state: combined.state().to_string(),
        label: scores.label,
        violation_recorded,
    }))
}
