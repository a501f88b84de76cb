//! Job-related API endpoints

use std::path::{Path, PathBuf};

use conformity_core::domain::job::{JobStatus, SessionId};
use conformity_core::domain::report::ReportEntry;
use conformity_core::dto::compare::CompareResponse;
use conformity_core::dto::job::StatusPayload;
use conformity_core::dto::report::ErrorsPayload;
use reqwest::multipart::{Form, Part};
use tracing::debug;

use crate::ComparisonClient;
use crate::error::{ClientError, Result};

/// Document extensions the service accepts for comparison
pub const SUPPORTED_EXTENSIONS: &[&str] = &["pdf", "docx", "doc", "txt"];

impl ComparisonClient {
    // =============================================================================
    // Job Lifecycle
    // =============================================================================

    /// Upload a requirements specification and a project document for comparison
    ///
    /// Both files are validated locally before anything is sent.
    ///
    /// # Arguments
    /// * `spec_file` - The requirements specification (uploaded as `tz_file`)
    /// * `project_file` - The project document (uploaded as `project_file`)
    ///
    /// # Returns
    /// The session of the newly created job
    pub async fn submit_comparison(
        &self,
        spec_file: &Path,
        project_file: &Path,
    ) -> Result<SessionId> {
        validate_document(spec_file)?;
        validate_document(project_file)?;

        let form = Form::new()
            .part("tz_file", file_part(spec_file).await?)
            .part("project_file", file_part(project_file).await?);

        let url = format!("{}/compare", self.base_url);
        debug!("Submitting comparison to {}", url);
        let response = self.client.post(&url).multipart(form).send().await?;

        let body: CompareResponse = self.handle_response(response).await?;
        body.into_session().map_err(ClientError::InvalidRequest)
    }

    /// Get the current status of a job
    ///
    /// # Arguments
    /// * `session` - The job's session
    ///
    /// # Returns
    /// A normalized status snapshot
    pub async fn get_status(&self, session: &SessionId) -> Result<JobStatus> {
        let url = format!("{}/status/{}", self.base_url, session);
        debug!("Polling status at {}", url);
        let response = self.client.get(&url).send().await?;

        let payload: StatusPayload = self.handle_response(response).await?;
        Ok(payload.into_status())
    }

    /// Get the compliance report from the legacy errors endpoint
    ///
    /// # Arguments
    /// * `session` - The job's session
    ///
    /// # Returns
    /// The report entries in server order
    pub async fn get_report(&self, session: &SessionId) -> Result<Vec<ReportEntry>> {
        let url = format!("{}/errors/{}", self.base_url, session);
        let response = self.client.get(&url).send().await?;

        let payload: ErrorsPayload = self.handle_response(response).await?;
        Ok(payload.errors)
    }

    /// Get the compliance report of a completed job
    ///
    /// Prefers the report embedded in the status payload and falls back to
    /// the legacy errors endpoint when the status carries none.
    pub async fn fetch_report(&self, session: &SessionId) -> Result<Vec<ReportEntry>> {
        match self.get_status(session).await? {
            JobStatus::Completed {
                report: Some(report),
                ..
            } => Ok(report),
            JobStatus::Completed { report: None, .. } => self.get_report(session).await,
            JobStatus::Processing { progress } => Err(ClientError::InvalidRequest(format!(
                "the job is still processing ({progress:.0}%)"
            ))),
            JobStatus::Failed { message } => Err(ClientError::InvalidRequest(format!(
                "the job failed: {message}"
            ))),
        }
    }

    /// Download the report file of a completed job
    ///
    /// # Returns
    /// The raw report bytes; an empty body is an error
    pub async fn download_report(&self, session: &SessionId) -> Result<Vec<u8>> {
        let url = format!("{}/download-report/{}", self.base_url, session);
        let response = self.client.get(&url).send().await?;

        self.handle_bytes(response).await
    }

    /// Download the report file into `dir` as `report_<session>.pdf`
    ///
    /// # Returns
    /// Path of the written file
    pub async fn save_report(&self, session: &SessionId, dir: &Path) -> Result<PathBuf> {
        let bytes = self.download_report(session).await?;
        let path = dir.join(report_file_name(session));
        tokio::fs::write(&path, &bytes).await?;
        debug!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(path)
    }
}

/// File name a downloaded report is saved under
pub fn report_file_name(session: &SessionId) -> String {
    format!("report_{}.pdf", session)
}

/// Checks that a document exists and has a supported extension
fn validate_document(path: &Path) -> Result<()> {
    if !path.is_file() {
        return Err(ClientError::InvalidRequest(format!(
            "file not found: {}",
            path.display()
        )));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    if !SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(ClientError::InvalidRequest(format!(
            "unsupported file type: {} (expected one of: {})",
            path.display(),
            SUPPORTED_EXTENSIONS.join(", ")
        )));
    }

    Ok(())
}

async fn file_part(path: &Path) -> Result<Part> {
    let bytes = tokio::fs::read(path).await?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    Ok(Part::bytes(bytes).file_name(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_missing_file() {
        let err = validate_document(Path::new("/nonexistent/spec.pdf")).unwrap_err();
        assert!(matches!(err, ClientError::InvalidRequest(msg) if msg.contains("not found")));
    }

    #[test]
    fn test_validate_rejects_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spec.xlsx");
        std::fs::write(&path, b"x").unwrap();

        let err = validate_document(&path).unwrap_err();
        assert!(matches!(err, ClientError::InvalidRequest(msg) if msg.contains("unsupported")));
    }

    #[test]
    fn test_validate_accepts_uppercase_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("SPEC.PDF");
        std::fs::write(&path, b"x").unwrap();

        assert!(validate_document(&path).is_ok());
    }

    #[test]
    fn test_report_file_name() {
        let session = SessionId::parse("abc").unwrap();
        assert_eq!(report_file_name(&session), "report_abc.pdf");
    }
}
