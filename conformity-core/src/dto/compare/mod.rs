//! Comparison submission DTOs

use serde::{Deserialize, Serialize};

use crate::domain::job::SessionId;

/// Response of `POST /compare`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareResponse {
    pub status: String,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl CompareResponse {
    /// Extracts the session of an accepted submission
    ///
    /// Anything other than `processing` with a session id is a rejection,
    /// reported with the server message when one was sent.
    pub fn into_session(self) -> Result<SessionId, String> {
        if self.status == "processing" {
            if let Some(id) = self.session_id.and_then(SessionId::parse) {
                return Ok(id);
            }
        }
        Err(self
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| "the server rejected the uploaded files".to_string()))
    }
}
