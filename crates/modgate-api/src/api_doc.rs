//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error::ErrorResponse;
use crate::handlers;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Modgate API",
        description = "Multi-modal content moderation gateway",
        version = "0.1.0"
    ),
    paths(
        handlers::analyze_text::analyze_text,
        handlers::analyze_audio::analyze_audio,
        handlers::analyze_file::analyze_file,
        handlers::report::get_report,
        handlers::admin::put_threshold,
        handlers::admin::get_threshold,
        handlers::health::health,
    ),
    components(schemas(
        handlers::analyze_text::AnalyzeTextRequest,
        handlers::analyze_text::AnalyzeTextResponse,
        handlers::analyze_audio::AnalyzeAudioResponse,
        handlers::analyze_file::AnalyzeFileResponse,
        handlers::report::ReportResponse,
        handlers::admin::ThresholdRequest,
        handlers::admin::ThresholdResponse,
        ErrorResponse,
    )),
    tags(
        (name = "analyze", description = "Content analysis endpoints"),
        (name = "reports", description = "Violation reporting"),
        (name = "admin", description = "Runtime administration"),
        (name = "health", description = "Liveness probes")
    )
)]
pub struct ApiDoc;
