//! Conformity HTTP Client
//!
//! A simple, type-safe HTTP client for the document-comparison service.
//!
//! The client covers every endpoint the front end consumes: submitting a
//! comparison, polling job status, fetching and downloading the compliance
//! report, and the on-demand explain and document-lookup actions. Response
//! payloads are normalized into `conformity_core` domain types.
//!
//! # Example
//!
//! ```no_run
//! use conformity_client::ComparisonClient;
//! use conformity_core::domain::job::SessionId;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ComparisonClient::new("http://localhost:8000");
//!     let session = SessionId::parse("3f2a").unwrap();
//!
//!     let status = client.get_status(&session).await?;
//!     println!("Job is {}", status.label());
//!     Ok(())
//! }
//! ```

pub mod error;
mod explain;
mod jobs;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use jobs::{SUPPORTED_EXTENSIONS, report_file_name};

use reqwest::Client;
use serde::de::DeserializeOwned;

/// HTTP client for the comparison service API
///
/// Methods are organized into logical groups:
/// - Job lifecycle (submit, status, report, download)
/// - On-demand actions (explain, find in document)
#[derive(Debug, Clone)]
pub struct ComparisonClient {
    /// Base URL of the service (e.g., "http://localhost:8000")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl ComparisonClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the comparison service (e.g., "http://localhost:8000")
    ///
    /// # Example
    /// ```
    /// use conformity_client::ComparisonClient;
    ///
    /// let client = ComparisonClient::new("http://localhost:8000");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Example
    /// ```
    /// use conformity_client::ComparisonClient;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = ComparisonClient::with_client("http://localhost:8000", http_client);
    /// ```
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the service
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let response = Self::check_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Handle an API response carrying a binary body
    async fn handle_bytes(&self, response: reqwest::Response) -> Result<Vec<u8>> {
        let response = Self::check_status(response).await?;
        let bytes = response.bytes().await?;

        if bytes.is_empty() {
            return Err(ClientError::EmptyBody);
        }

        Ok(bytes.to_vec())
    }

    /// Turns a non-success response into an [`ClientError::ApiError`]
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(ClientError::api_error(
            status.as_u16(),
            error_message(&error_text),
        ))
    }
}

/// Pulls a human-readable message out of an error body
///
/// The service reports errors as `{"detail": ...}`; older handlers use
/// `message` or `error`. Anything else is passed through verbatim.
fn error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.to_string();
    };

    ["detail", "message", "error"]
        .iter()
        .find_map(|key| match value.get(key) {
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(serde_json::Value::Null) | None => None,
            Some(other) => Some(other.to_string()),
        })
        .unwrap_or_else(|| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = ComparisonClient::new("http://localhost:8000");
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = ComparisonClient::new("http://localhost:8000/");
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[test]
    fn test_error_message_prefers_detail() {
        assert_eq!(error_message(r#"{"detail":"Отчет не найден"}"#), "Отчет не найден");
        assert_eq!(error_message(r#"{"message":"bad"}"#), "bad");
        assert_eq!(error_message("plain failure"), "plain failure");
        assert_eq!(error_message(r#"{"other":1}"#), r#"{"other":1}"#);
    }
}
