use service_core::error::AppError;
use thiserror::Error;

/// Failures raised by the report pipeline.
///
/// `TemplateMissing` marks a broken deployment (the packaged layout is the
/// build artifact, not request data) and is surfaced distinctly from
/// per-request errors so operators can tell the two apart.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("report template missing: {0}")]
    TemplateMissing(String),

    #[error("render failure: {0}")]
    RenderFailure(String),

    #[error("export failure: {0}")]
    ExportFailure(String),
}

impl ReportError {
    /// Stable label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ReportError::InvalidRequest(_) => "invalid_request",
            ReportError::TemplateMissing(_) => "template_missing",
            ReportError::RenderFailure(_) => "render_failure",
            ReportError::ExportFailure(_) => "export_failure",
        }
    }
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::InvalidRequest(msg) => {
                AppError::BadRequest(anyhow::anyhow!("invalid request: {}", msg))
            }
            ReportError::TemplateMissing(msg) => {
                AppError::ServiceUnavailable(anyhow::anyhow!("report template missing: {}", msg))
            }
            ReportError::RenderFailure(msg) => {
                AppError::InternalError(anyhow::anyhow!("render failure: {}", msg))
            }
            ReportError::ExportFailure(msg) => {
                AppError::InternalError(anyhow::anyhow!("export failure: {}", msg))
            }
        }
    }
}
