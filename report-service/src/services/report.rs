//! Orchestration of the usage report pipeline.

use crate::dtos::UsageReportRequest;
use crate::error::ReportError;
use crate::render::{bind, export, render, TemplateCache};
use std::path::Path;
use std::time::Instant;
use validator::Validate;

/// Composes bind, render, and export for one report design.
///
/// Holds no per-request state; the template cache is write-once and
/// thereafter read-only, so the service is safe to share across
/// concurrent requests.
pub struct ReportService {
    templates: TemplateCache,
}

impl ReportService {
    pub fn new(template_path: impl AsRef<Path>) -> Self {
        Self {
            templates: TemplateCache::new(template_path.as_ref()),
        }
    }

    /// Compile the template ahead of the first request.
    ///
    /// Failure means the deployed artifact is broken; renders will keep
    /// reporting the template as missing until it is fixed.
    pub fn warm_up(&self) -> Result<(), ReportError> {
        self.templates.get().map(|_| ())
    }

    /// Run the full pipeline: validate, bind, render, export.
    ///
    /// Linear and fail-fast; any step error aborts the render with no
    /// partial output and no retry. Log context stays free of resident
    /// identity fields.
    pub fn generate_usage_report(
        &self,
        request: &UsageReportRequest,
    ) -> Result<Vec<u8>, ReportError> {
        let start = Instant::now();
        let result = self.run_pipeline(request);

        match &result {
            Ok(bytes) => {
                metrics::counter!("usage_reports_generated_total").increment(1);
                metrics::histogram!("usage_report_render_duration_seconds")
                    .record(start.elapsed().as_secs_f64());
                tracing::info!(
                    size_bytes = bytes.len(),
                    program_count = request.programs.len(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Usage report generated"
                );
            }
            Err(e) => {
                metrics::counter!("usage_reports_failed_total", "kind" => e.kind()).increment(1);
                match e {
                    ReportError::InvalidRequest(_) => {
                        tracing::warn!(error = %e, "Rejected usage report request");
                    }
                    ReportError::TemplateMissing(_) => {
                        tracing::error!(error = %e, "Report template unavailable");
                    }
                    _ => {
                        tracing::error!(
                            error = %e,
                            program_count = request.programs.len(),
                            "Usage report pipeline failed"
                        );
                    }
                }
            }
        }

        result
    }

    fn run_pipeline(&self, request: &UsageReportRequest) -> Result<Vec<u8>, ReportError> {
        request
            .validate()
            .map_err(|e| ReportError::InvalidRequest(e.to_string()))?;

        let template = self.templates.get()?;
        let (params, rows) = bind(request, chrono::Local::now().date_naive())?;
        let document = render(template, &params, &rows)?;
        export(&document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtos::UserInfo;
    use std::path::PathBuf;

    fn packaged_template() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("templates/usage_report.json")
    }

    fn valid_request() -> UsageReportRequest {
        UsageReportRequest {
            user: Some(UserInfo {
                name_first: "Jane".to_string(),
                name_last: "Doe".to_string(),
                doc_id: "D123".to_string(),
                facility_name: "Northgate".to_string(),
                created_at: "2023-01-10".to_string(),
                total_logins: 5,
            }),
            total_minutes: 125.0,
            total_resources: 3,
            programs: vec![],
        }
    }

    #[test]
    fn test_pipeline_produces_pdf_bytes() {
        let service = ReportService::new(packaged_template());
        let bytes = service
            .generate_usage_report(&valid_request())
            .expect("Failed to generate report");
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn test_missing_user_aborts_before_rendering() {
        let service = ReportService::new(packaged_template());
        let mut request = valid_request();
        request.user = None;

        let err = service
            .generate_usage_report(&request)
            .expect_err("Expected pipeline to fail");
        assert!(matches!(err, ReportError::InvalidRequest(_)));
    }

    #[test]
    fn test_negative_minutes_abort_before_rendering() {
        let service = ReportService::new(packaged_template());
        let mut request = valid_request();
        request.total_minutes = -10.0;

        let err = service
            .generate_usage_report(&request)
            .expect_err("Expected pipeline to fail");
        assert!(matches!(err, ReportError::InvalidRequest(_)));
    }

    #[test]
    fn test_missing_template_surfaces_distinctly() {
        let service = ReportService::new("templates/no_such_template.json");

        assert!(matches!(
            service.warm_up(),
            Err(ReportError::TemplateMissing(_))
        ));
        let err = service
            .generate_usage_report(&valid_request())
            .expect_err("Expected pipeline to fail");
        assert!(matches!(err, ReportError::TemplateMissing(_)));
    }
}
