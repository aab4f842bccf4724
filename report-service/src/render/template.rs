//! The packaged layout definition and its process-wide compile cache.
//!
//! The service renders exactly one report design, shipped as a JSON deploy
//! artifact. A missing or malformed file is a deployment defect, surfaced
//! as `TemplateMissing` rather than a per-request failure.

use crate::error::ReportError;
use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct ReportTemplate {
    pub name: String,
    pub page: PageSpec,
    pub title: TitleSpec,
    pub heading_size: f32,
    pub body_size: f32,
    pub line_spacing: f32,
    pub sections: Vec<SectionSpec>,
    pub table: TableSpec,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageSpec {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TitleSpec {
    pub text: String,
    pub size: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SectionSpec {
    #[serde(default)]
    pub heading: Option<String>,
    pub fields: Vec<FieldSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FieldSpec {
    pub label: String,
    pub param: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TableSpec {
    pub heading: String,
    /// Flag parameter gating the whole table band.
    pub visible_when: String,
    pub columns: Vec<ColumnSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ColumnSpec {
    pub header: String,
    pub field: String,
    pub width: f32,
}

impl ReportTemplate {
    pub fn content_width(&self) -> f32 {
        self.page.width - 2.0 * self.page.margin
    }

    fn validate(&self) -> Result<(), String> {
        if self.page.width <= 0.0 || self.page.height <= 0.0 {
            return Err("page dimensions must be positive".to_string());
        }
        if 2.0 * self.page.margin >= self.page.width.min(self.page.height) {
            return Err("margins leave no printable area".to_string());
        }
        if self.title.size <= 0.0 || self.heading_size <= 0.0 || self.body_size <= 0.0 {
            return Err("font sizes must be positive".to_string());
        }
        if self.line_spacing < 1.0 {
            return Err("line spacing must be at least 1.0".to_string());
        }
        if self.sections.iter().all(|s| s.fields.is_empty()) {
            return Err("template binds no parameter fields".to_string());
        }
        if self.table.columns.is_empty() {
            return Err("table defines no columns".to_string());
        }
        if self.table.columns.iter().any(|c| c.width <= 0.0) {
            return Err("table column widths must be positive".to_string());
        }
        let total: f32 = self.table.columns.iter().map(|c| c.width).sum();
        if total > self.content_width() + 0.5 {
            return Err(format!(
                "table columns ({}pt) exceed printable width ({}pt)",
                total,
                self.content_width()
            ));
        }
        Ok(())
    }
}

/// Load and structurally validate the layout definition at `path`.
pub fn load_template(path: &Path) -> Result<ReportTemplate, ReportError> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        ReportError::TemplateMissing(format!("{}: {}", path.display(), e))
    })?;

    let template: ReportTemplate = serde_json::from_str(&raw).map_err(|e| {
        ReportError::TemplateMissing(format!("{}: invalid layout definition: {}", path.display(), e))
    })?;

    template.validate().map_err(|e| {
        ReportError::TemplateMissing(format!("{}: invalid layout definition: {}", path.display(), e))
    })?;

    Ok(template)
}

/// Write-once cache of the compiled layout.
///
/// The definition never changes within a process lifetime, so the first
/// successful load is kept and shared across concurrent renders. A failed
/// load is not cached: every render retries until the artifact appears,
/// then the cache latches.
pub struct TemplateCache {
    path: PathBuf,
    cell: OnceCell<ReportTemplate>,
}

impl TemplateCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cell: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self) -> Result<&ReportTemplate, ReportError> {
        self.cell.get_or_try_init(|| load_template(&self.path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn packaged_template_path() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("templates/usage_report.json")
    }

    #[test]
    fn test_packaged_template_loads_and_validates() {
        let template =
            load_template(&packaged_template_path()).expect("Failed to load packaged template");

        assert_eq!(template.name, "usage_report");
        assert_eq!(template.title.text, "Resident Usage Transcript");
        assert_eq!(template.table.visible_when, "showPrograms");
        assert_eq!(template.table.columns.len(), 6);
    }

    #[test]
    fn test_missing_file_is_template_missing() {
        let err = load_template(Path::new("templates/no_such_report.json"))
            .expect_err("Expected load to fail");
        assert!(matches!(err, ReportError::TemplateMissing(_)));
    }

    #[test]
    fn test_malformed_file_is_template_missing() {
        let dir = std::env::temp_dir().join("report-template-tests");
        std::fs::create_dir_all(&dir).expect("Failed to create temp dir");
        let path = dir.join("malformed.json");
        std::fs::write(&path, "{ not json").expect("Failed to write file");

        let err = load_template(&path).expect_err("Expected load to fail");
        assert!(matches!(err, ReportError::TemplateMissing(_)));
    }

    #[test]
    fn test_structurally_invalid_template_is_rejected() {
        let dir = std::env::temp_dir().join("report-template-tests");
        std::fs::create_dir_all(&dir).expect("Failed to create temp dir");
        let path = dir.join("zero_width_column.json");

        let mut value: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(packaged_template_path())
                .expect("Failed to read packaged template"),
        )
        .expect("Failed to parse packaged template");
        value["table"]["columns"][0]["width"] = serde_json::json!(0.0);
        std::fs::write(&path, value.to_string()).expect("Failed to write file");

        let err = load_template(&path).expect_err("Expected load to fail");
        assert!(matches!(err, ReportError::TemplateMissing(_)));
    }

    #[test]
    fn test_cache_latches_first_successful_load() {
        let cache = TemplateCache::new(packaged_template_path());
        let first = cache.get().expect("Failed to load template") as *const ReportTemplate;
        let second = cache.get().expect("Failed to load template") as *const ReportTemplate;
        assert_eq!(first, second);
    }

    #[test]
    fn test_cache_retries_after_failure() {
        let dir = std::env::temp_dir().join(format!(
            "report-template-tests-{}",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).expect("Failed to create temp dir");
        let path = dir.join("late_arrival.json");
        let _ = std::fs::remove_file(&path);

        let cache = TemplateCache::new(&path);
        assert!(matches!(
            cache.get(),
            Err(ReportError::TemplateMissing(_))
        ));

        std::fs::copy(packaged_template_path(), &path).expect("Failed to copy template");
        assert!(cache.get().is_ok());
    }
}
