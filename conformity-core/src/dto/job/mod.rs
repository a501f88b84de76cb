//! Job status DTOs

use serde::{Deserialize, Serialize};

use crate::domain::job::{ComplianceSummary, JobStatus, UNKNOWN_ERROR};
use crate::domain::report::ReportEntry;
use crate::dto::report::parse_entries;

/// Raw response of `GET /status/{session_id}`
///
/// Field names differ between server revisions (`error` vs `error_message`,
/// `report` vs `extended_report`), so every variant is kept optional here and
/// resolved by [`StatusPayload::into_status`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusPayload {
    pub status: String,
    #[serde(default)]
    pub progress: Option<f64>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub total_compliance: Option<f64>,
    #[serde(default)]
    pub conclusion: Option<String>,
    #[serde(default)]
    pub report: Option<serde_json::Value>,
    #[serde(default)]
    pub extended_report: Option<serde_json::Value>,
}

impl StatusPayload {
    /// Normalizes the payload into a typed snapshot
    pub fn into_status(self) -> JobStatus {
        match self.status.trim().to_lowercase().as_str() {
            "processing" => JobStatus::Processing {
                progress: self.progress.unwrap_or(0.0).clamp(0.0, 100.0),
            },
            "completed" => {
                let summary = self.total_compliance.map(|total| ComplianceSummary {
                    total_compliance: total,
                    conclusion: self.conclusion.clone().unwrap_or_default(),
                });
                let report = Self::embedded_report(self.extended_report, self.report);
                JobStatus::Completed { summary, report }
            }
            "error" => JobStatus::Failed {
                message: first_non_blank([self.error, self.error_message])
                    .unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
            },
            other => JobStatus::Failed {
                message: format!("unknown processing status: {other}"),
            },
        }
    }

    /// The extended report wins over the plain one when both parse
    fn embedded_report(
        extended: Option<serde_json::Value>,
        plain: Option<serde_json::Value>,
    ) -> Option<Vec<ReportEntry>> {
        extended
            .and_then(parse_entries)
            .or_else(|| plain.and_then(parse_entries))
    }
}

impl From<StatusPayload> for JobStatus {
    fn from(payload: StatusPayload) -> Self {
        payload.into_status()
    }
}

fn first_non_blank<const N: usize>(candidates: [Option<String>; N]) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .find(|s| !s.trim().is_empty())
}
