//! Job domain types

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::domain::report::ReportEntry;

/// Message shown when the server reports a failure without details
pub const UNKNOWN_ERROR: &str = "unknown error";

/// Opaque identifier of one server-side comparison job
///
/// Never blank; deserialization goes through [`SessionId::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionId(String);

/// A blank session token
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("session id cannot be blank")]
pub struct BlankSessionId;

impl SessionId {
    /// Wraps a raw session token, rejecting blank values
    pub fn parse(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SessionId {
    type Error = BlankSessionId;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(raw).ok_or(BlankSessionId)
    }
}

impl From<SessionId> for String {
    fn from(id: SessionId) -> Self {
        id.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Overall compliance verdict attached to a completed job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceSummary {
    /// Percentage of requirements met, 0–100
    pub total_compliance: f64,
    pub conclusion: String,
}

impl ComplianceSummary {
    /// Compliance percentage clamped to 0–100
    pub fn percent(&self) -> f64 {
        if self.total_compliance.is_nan() {
            0.0
        } else {
            self.total_compliance.clamp(0.0, 100.0)
        }
    }

    /// Number of filled cells in a meter `width` cells wide
    pub fn meter_cells(&self, width: usize) -> usize {
        let filled = (self.percent() / 100.0 * width as f64).round() as usize;
        filled.min(width)
    }
}

/// Snapshot of a job's state as returned by one status poll
///
/// Snapshots are never mutated; each poll yields a fresh value.
#[derive(Debug, Clone, PartialEq)]
pub enum JobStatus {
    /// Comparison still running
    Processing {
        /// Progress percentage, 0–100
        progress: f64,
    },
    /// Comparison finished
    Completed {
        summary: Option<ComplianceSummary>,
        /// Report embedded in the status payload, when the server sends one
        report: Option<Vec<ReportEntry>>,
    },
    /// Comparison failed on the server
    Failed { message: String },
}

impl JobStatus {
    /// Whether no further polling should happen after this snapshot
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobStatus::Processing { .. })
    }

    /// Short lowercase label used in logs
    pub fn label(&self) -> &'static str {
        match self {
            JobStatus::Processing { .. } => "processing",
            JobStatus::Completed { .. } => "completed",
            JobStatus::Failed { .. } => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_rejects_blank() {
        assert!(SessionId::parse("").is_none());
        assert!(SessionId::parse("   ").is_none());
        assert_eq!(SessionId::parse(" abc ").unwrap().as_str(), "abc");
    }

    #[test]
    fn test_session_id_deserialization_rejects_blank() {
        assert!(serde_json::from_str::<SessionId>("\"\"").is_err());
        assert!(serde_json::from_str::<SessionId>("\"  \"").is_err());

        let id: SessionId = serde_json::from_str("\" 3f2a \"").unwrap();
        assert_eq!(id.as_str(), "3f2a");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"3f2a\"");
    }

    #[test]
    fn test_meter_is_proportional() {
        let summary = ComplianceSummary {
            total_compliance: 87.0,
            conclusion: "OK".to_string(),
        };
        assert_eq!(summary.meter_cells(100), 87);
        assert_eq!(summary.meter_cells(20), 17);
    }

    #[test]
    fn test_meter_clamps_out_of_range() {
        let over = ComplianceSummary {
            total_compliance: 140.0,
            conclusion: String::new(),
        };
        let under = ComplianceSummary {
            total_compliance: -5.0,
            conclusion: String::new(),
        };
        assert_eq!(over.meter_cells(20), 20);
        assert_eq!(under.meter_cells(20), 0);
    }

    #[test]
    fn test_terminal_states() {
        assert!(!JobStatus::Processing { progress: 10.0 }.is_terminal());
        assert!(
            JobStatus::Completed {
                summary: None,
                report: None
            }
            .is_terminal()
        );
        assert!(
            JobStatus::Failed {
                message: "x".into()
            }
            .is_terminal()
        );
    }
}
