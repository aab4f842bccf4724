//! Binding of a validated request into the named-parameter set and the
//! repeating row source consumed by the template renderer.

use crate::dtos::{ProgramInfo, UsageReportRequest};
use crate::error::ReportError;
use crate::render::duration::format_duration;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Scalar value bound under a parameter name.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Text(String),
    Flag(bool),
}

/// Named parameters for a single render, consumed once and discarded.
#[derive(Debug, Clone, Default)]
pub struct RenderParameters {
    values: BTreeMap<String, ParamValue>,
}

impl RenderParameters {
    pub fn insert_text(&mut self, name: &str, value: impl Into<String>) {
        self.values
            .insert(name.to_string(), ParamValue::Text(value.into()));
    }

    pub fn insert_flag(&mut self, name: &str, value: bool) {
        self.values
            .insert(name.to_string(), ParamValue::Flag(value));
    }

    /// Text value bound under `name`, if any.
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.values.get(name) {
            Some(ParamValue::Text(value)) => Some(value),
            _ => None,
        }
    }

    /// Flag value bound under `name`, if any.
    pub fn flag(&self, name: &str) -> Option<bool> {
        match self.values.get(name) {
            Some(ParamValue::Flag(value)) => Some(*value),
            _ => None,
        }
    }
}

/// One display row of the repeating program table.
///
/// Fields are addressable by the names the template's column bindings use.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramRow {
    pub program_name: String,
    pub class_name: String,
    pub status: String,
    pub attendance: String,
    pub start_date: String,
    pub end_date: String,
}

impl ProgramRow {
    pub fn field(&self, name: &str) -> Option<&str> {
        match name {
            "programName" => Some(&self.program_name),
            "className" => Some(&self.class_name),
            "status" => Some(&self.status),
            "attendance" => Some(&self.attendance),
            "startDate" => Some(&self.start_date),
            "endDate" => Some(&self.end_date),
            _ => None,
        }
    }
}

impl From<&ProgramInfo> for ProgramRow {
    fn from(program: &ProgramInfo) -> Self {
        Self {
            program_name: program.program_name.clone(),
            class_name: program.class_name.clone(),
            status: program.status.clone(),
            attendance: program.attendance_percentage.clone(),
            start_date: program.start_date.clone(),
            end_date: program.end_date.clone(),
        }
    }
}

/// Map a request into the parameter set and row sequence for one render.
///
/// `generated_on` is the server-side generation date; the orchestrator
/// passes the current date, tests pin it. Name composition and the date
/// range are literal concatenations: whatever whitespace or formatting the
/// inputs carry is embedded unchanged.
pub fn bind(
    request: &UsageReportRequest,
    generated_on: NaiveDate,
) -> Result<(RenderParameters, Vec<ProgramRow>), ReportError> {
    let user = request
        .user
        .as_ref()
        .ok_or_else(|| ReportError::InvalidRequest("user is required".to_string()))?;

    let mut params = RenderParameters::default();
    params.insert_text(
        "residentName",
        format!("{} {}", user.name_first, user.name_last),
    );
    params.insert_text("residentId", user.doc_id.clone());
    params.insert_text("facilityName", user.facility_name.clone());
    params.insert_text(
        "generatedDate",
        generated_on.format("%B %-d, %Y").to_string(),
    );
    params.insert_text("dateRange", format!("{} - present", user.created_at));
    params.insert_text("totalTime", format_duration(request.total_minutes));
    params.insert_text("totalLogins", user.total_logins.to_string());
    params.insert_text("totalResources", request.total_resources.to_string());
    params.insert_flag("showPrograms", !request.programs.is_empty());

    let rows = request.programs.iter().map(ProgramRow::from).collect();

    Ok((params, rows))
}
