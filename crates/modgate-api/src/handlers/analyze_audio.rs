use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use modgate_core::models::{ContentType, Upload};
use modgate_core::AppError;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct AnalyzeAudioResponse {
    pub transcription: String,
    pub toxicity_score: f32,
    pub score_state: String,
    pub violation_recorded: bool,
}

#[utoipa::path(
    post,
    path = "/api/v0/analyze/audio",
    tag = "analyze",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Audio analyzed", body = AnalyzeAudioResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart))]
pub async fn analyze_audio(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<AnalyzeAudioResponse>, HttpAppError> {
    let upload = read_upload(multipart).await?;

    // No size pre-check here: the pipeline's own audio gate turns an
    // oversized upload into a graceful "too large" result with a
    // sentinel score instead of a transport error.
    let result = state.pipeline.process(&upload).await;
    let transcription = result
        .description
        .strip_prefix("Audio file transcription: ")
        .unwrap_or(&result.description)
        .to_string();

    let violation_recorded = match &upload.user_id {
        Some(user_id) => {
            state
                .gate
                .maybe_record(
                    user_id,
                    ContentType::Audio,
                    &result.description,
                    result.toxicity_score,
                )
                .await
        }
        None => false,
    };

    Ok(Json(AnalyzeAudioResponse {
        transcription,
        toxicity_score: result.toxicity_score.wire_value(),
        score_state: result.toxicity_score.state().to_string(),
        violation_recorded,
    }))
}

/// Shared multipart reader: a required `file` part plus an optional
/// `user_id` text part.
pub async fn read_upload(mut multipart: Multipart) -> Result<Upload, HttpAppError> {
    let mut file: Option<(bytes::Bytes, String)> = None;
    let mut user_id: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Invalid multipart body: {}", e)))?
    {
        match field.name() {
            Some("file") => {
                let filename = field.file_name().unwrap_or("upload").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::InvalidInput(format!("Failed to read file: {}", e)))?;
                file = Some((data, filename));
            }
            Some("user_id") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::InvalidInput(format!("Invalid user_id: {}", e)))?;
                if !value.is_empty() {
                    user_id = Some(value);
                }
            }
            _ => {}
        }
    }

    let (data, filename) =
        file.ok_or_else(|| AppError::InvalidInput("missing 'file' field".to_string()))?;
    if data.is_empty() {
        return Err(AppError::InvalidInput("uploaded file is empty".to_string()).into());
    }

    let mut upload = Upload::new(data, filename);
    if let Some(user_id) = user_id {
        upload = upload.with_user(user_id);
    }
    Ok(upload)
}
