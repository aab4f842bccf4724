//! The report-rendering pipeline: parameter binding, template compilation,
//! paginated layout, and PDF serialization.

pub mod duration;
pub mod layout;
pub mod params;
pub mod pdf;
pub mod template;

pub use duration::format_duration;
pub use layout::{render, RenderedDocument};
pub use params::{bind, ParamValue, ProgramRow, RenderParameters};
pub use pdf::export;
pub use template::{load_template, ReportTemplate, TemplateCache};
