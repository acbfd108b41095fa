//! HTTP error response conversion.
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`; errors built
//! as `AppError` become consistent JSON responses (status, code, message).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use modgate_core::AppError;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    /// Machine-readable error code for programmatic handling
    pub code: String,
}

/// Wrapper type for AppError to implement IntoResponse. Needed because of
/// orphan rules: IntoResponse is external and AppError lives in modgate-core.
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::Internal(err.to_string()))
    }
}

fn status_for(error: &AppError) -> StatusCode {
    match error {
        AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
        AppError::ExternalService(_) => StatusCode::BAD_GATEWAY,
        AppError::Database(_) | AppError::MediaProcessing(_) | AppError::Internal(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let error = &self.0;
        let status = status_for(error);

        if status.is_server_error() {
            tracing::error!(error = %error, code = error.error_code(), "Request failed");
        } else {
            tracing::warn!(error = %error, code = error.error_code(), "Request rejected");
        }

        let body = Json(ErrorResponse {
            error: error.to_string(),
            code: error.error_code().to_string(),
        });

        (status, body).into_response()
    }
}
