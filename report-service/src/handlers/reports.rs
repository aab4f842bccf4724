use crate::dtos::UsageReportRequest;
use crate::startup::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;

/// Generate a usage transcript PDF for one resident.
///
/// The decoded request is handed to the pipeline as-is; on success the
/// whole document comes back as one buffered attachment.
pub async fn generate_usage_report(
    State(state): State<AppState>,
    Json(request): Json<UsageReportRequest>,
) -> Result<impl IntoResponse, AppError> {
    let bytes = state
        .reports
        .generate_usage_report(&request)
        .map_err(AppError::from)?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"transcript.pdf\"".to_string(),
            ),
            (header::CONTENT_LENGTH, bytes.len().to_string()),
        ],
        bytes,
    ))
}
