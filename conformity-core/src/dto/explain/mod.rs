//! Explanation DTOs

use serde::{Deserialize, Serialize};

/// Body of `POST /explain`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplainRequest {
    pub requirement: String,
}

/// Body of `POST /detailed-explain`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedExplainRequest {
    pub requirement: String,
    pub session_id: String,
}

/// Response of both explain endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplainResponse {
    pub explanation: String,
}
