//! On-demand explanation and document lookup endpoints

use conformity_core::domain::job::SessionId;
use conformity_core::dto::explain::{DetailedExplainRequest, ExplainRequest, ExplainResponse};
use conformity_core::dto::locate::{DocumentExcerpt, FindInDocumentRequest, FindInDocumentResponse};
use tracing::debug;

use crate::ComparisonClient;
use crate::error::Result;

impl ComparisonClient {
    // =============================================================================
    // Explanations
    // =============================================================================

    /// Ask the service why a requirement received its status
    ///
    /// # Arguments
    /// * `requirement` - Text of the requirement to explain
    ///
    /// # Returns
    /// The free-text explanation
    pub async fn explain(&self, requirement: &str) -> Result<String> {
        let url = format!("{}/explain", self.base_url);
        debug!("Requesting explanation from {}", url);
        let response = self
            .client
            .post(&url)
            .json(&ExplainRequest {
                requirement: requirement.to_string(),
            })
            .send()
            .await?;

        let body: ExplainResponse = self.handle_response(response).await?;
        Ok(body.explanation)
    }

    /// Ask for an explanation grounded in the documents of one job
    ///
    /// # Arguments
    /// * `requirement` - Text of the requirement to explain
    /// * `session` - The job whose documents should be consulted
    pub async fn detailed_explain(&self, requirement: &str, session: &SessionId) -> Result<String> {
        let url = format!("{}/detailed-explain", self.base_url);
        debug!("Requesting detailed explanation from {}", url);
        let response = self
            .client
            .post(&url)
            .json(&DetailedExplainRequest {
                requirement: requirement.to_string(),
                session_id: session.to_string(),
            })
            .send()
            .await?;

        let body: ExplainResponse = self.handle_response(response).await?;
        Ok(body.explanation)
    }

    // =============================================================================
    // Document Lookup
    // =============================================================================

    /// Locate the fragment of the project document a requirement refers to
    ///
    /// # Returns
    /// The matching excerpts, or `None` when the service found nothing
    pub async fn find_in_document(
        &self,
        requirement: &str,
        session: &SessionId,
    ) -> Result<Option<Vec<DocumentExcerpt>>> {
        let url = format!("{}/find-in-document", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&FindInDocumentRequest {
                requirement: requirement.to_string(),
                session_id: session.to_string(),
            })
            .send()
            .await?;

        let body: FindInDocumentResponse = self.handle_response(response).await?;
        Ok(body.into_excerpts())
    }
}
