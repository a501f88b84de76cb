//! Document lookup DTOs

use serde::{Deserialize, Serialize};

/// Body of `POST /find-in-document`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindInDocumentRequest {
    pub requirement: String,
    pub session_id: String,
}

/// A fragment of the source document matching a requirement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentExcerpt {
    pub content: String,
}

/// Response of `POST /find-in-document`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FindInDocumentResponse {
    #[serde(default)]
    pub found: bool,
    #[serde(default)]
    pub results: Vec<DocumentExcerpt>,
}

impl FindInDocumentResponse {
    /// Excerpts to display, or `None` when the lookup came back empty
    pub fn into_excerpts(self) -> Option<Vec<DocumentExcerpt>> {
        if self.found && !self.results.is_empty() {
            Some(self.results)
        } else {
            None
        }
    }
}
