//! Compliance report types

use serde::{Deserialize, Serialize};

/// Section used for entries the server did not attribute to one
pub const DEFAULT_SECTION: &str = "Общие требования";

/// Status literals that denote a compliant requirement (case-folded)
const COMPLIANT_STATUSES: &[&str] = &["соответствует", "соответствует тз", "compliant"];

/// One requirement-compliance finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub requirement: String,
    pub status: String,
    #[serde(default)]
    pub criticality: String,
    #[serde(default)]
    pub analysis: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
}

impl ReportEntry {
    /// Whether the status is one of the compliant literals
    pub fn is_compliant(&self) -> bool {
        let status = self.status.trim().to_lowercase();
        COMPLIANT_STATUSES.contains(&status.as_str())
    }

    /// Section label, falling back to [`DEFAULT_SECTION`]
    pub fn section(&self) -> &str {
        match self.section.as_deref() {
            Some(s) if !s.trim().is_empty() => s,
            _ => DEFAULT_SECTION,
        }
    }

    /// Case-folded text the search engine matches against
    pub fn haystack(&self) -> String {
        format!(
            "{} {} {} {} {}",
            self.requirement, self.status, self.criticality, self.analysis, self.section()
        )
        .to_lowercase()
    }
}
