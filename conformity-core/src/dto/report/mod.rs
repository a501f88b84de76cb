//! Report DTOs

use serde::{Deserialize, Serialize};

use crate::domain::report::ReportEntry;

/// Response of the legacy `GET /errors/{session_id}` endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorsPayload {
    #[serde(alias = "report")]
    pub errors: Vec<ReportEntry>,
}

/// Leniently reads a list of report entries from an arbitrary JSON value
///
/// Accepts a bare array of entries or an object holding one under `errors`
/// or `report`. Returns `None` for anything else.
pub fn parse_entries(value: serde_json::Value) -> Option<Vec<ReportEntry>> {
    match value {
        serde_json::Value::Array(_) => serde_json::from_value(value).ok(),
        serde_json::Value::Object(_) => serde_json::from_value::<ErrorsPayload>(value)
            .ok()
            .map(|payload| payload.errors),
        _ => None,
    }
}
