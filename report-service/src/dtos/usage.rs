use serde::Deserialize;
use validator::Validate;

/// Decoded usage report request.
///
/// The transport layer deserializes the wire payload into this shape and
/// hands it to the pipeline as-is. Every string field tolerates being
/// absent; only a missing `user` object is rejected (the identity
/// parameters cannot be built without it).
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UsageReportRequest {
    pub user: Option<UserInfo>,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "totalMinutes must be non-negative"))]
    pub total_minutes: f64,
    #[serde(default)]
    pub total_resources: u64,
    #[serde(default)]
    pub programs: Vec<ProgramInfo>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    #[serde(default)]
    pub name_first: String,
    #[serde(default)]
    pub name_last: String,
    #[serde(default)]
    pub doc_id: String,
    #[serde(default)]
    pub facility_name: String,
    /// Account creation timestamp, passed through verbatim (never parsed).
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub total_logins: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramInfo {
    #[serde(default)]
    pub program_name: String,
    #[serde(default)]
    pub class_name: String,
    #[serde(default)]
    pub status: String,
    /// Pre-formatted upstream; not parsed or validated numerically.
    #[serde(default)]
    pub attendance_percentage: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserializes_full_request() {
        let request: UsageReportRequest = serde_json::from_value(serde_json::json!({
            "user": {
                "nameFirst": "Jane",
                "nameLast": "Doe",
                "docId": "D123",
                "facilityName": "Northgate",
                "createdAt": "2023-01-10",
                "totalLogins": 5
            },
            "totalMinutes": 125.0,
            "totalResources": 3,
            "programs": [{
                "programName": "HSE Prep",
                "className": "Morning Cohort",
                "status": "Enrolled",
                "attendancePercentage": "87%",
                "startDate": "2023-02-01",
                "endDate": "2023-06-30"
            }]
        }))
        .expect("Failed to deserialize request");

        let user = request.user.expect("Missing user");
        assert_eq!(user.name_first, "Jane");
        assert_eq!(user.total_logins, 5);
        assert_eq!(request.programs.len(), 1);
        assert_eq!(request.programs[0].attendance_percentage, "87%");
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let request: UsageReportRequest = serde_json::from_value(serde_json::json!({
            "user": { "nameFirst": "Jane" }
        }))
        .expect("Failed to deserialize request");

        let user = request.user.expect("Missing user");
        assert_eq!(user.name_last, "");
        assert_eq!(user.doc_id, "");
        assert_eq!(request.total_minutes, 0.0);
        assert!(request.programs.is_empty());
    }

    #[test]
    fn test_absent_user_is_representable() {
        let request: UsageReportRequest =
            serde_json::from_value(serde_json::json!({ "totalMinutes": 10.0 }))
                .expect("Failed to deserialize request");
        assert!(request.user.is_none());
    }

    #[test]
    fn test_negative_minutes_fail_validation() {
        let request: UsageReportRequest = serde_json::from_value(serde_json::json!({
            "user": {},
            "totalMinutes": -5.0
        }))
        .expect("Failed to deserialize request");
        assert!(request.validate().is_err());
    }
}
