use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use modgate_core::models::ContentType;

use super::analyze_audio::read_upload;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct AnalyzeFileResponse {
    pub description: String,
    pub toxicity_score: f32,
    pub score_state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_score: Option<f32>,
    pub mime_type: String,
    pub byte_size: u64,
    pub violation_recorded: bool,
}

#[utoipa::path(
    post,
    path = "/api/v0/analyze/file",
    tag = "analyze",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "File analyzed", body = AnalyzeFileResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart))]
pub async fn analyze_file(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<AnalyzeFileResponse>, HttpAppError> {
    let upload = read_upload(multipart).await?;

    let result = state.pipeline.process(&upload).await;

    let violation_recorded = match &upload.user_id {
        Some(user_id) => {
            state
                .gate
                .maybe_record(
                    user_id,
                    ContentType::File,
                    &result.description,
                    result.toxicity_score,
                )
                .await
        }
        None => false,
    };

    Ok(Json(AnalyzeFileResponse {
        description: result.description,
        toxicity_score: result.toxicity_score.wire_value(),
        score_state: result.toxicity_score.state().to_string(),
        secondary_score: result.secondary_score.map(|s| s.wire_value()),
        mime_type: result.mime_type,
        byte_size: result.byte_size,
        violation_recorded,
    }))
}
