//! On-demand actions on a single report entry
//!
//! Explain and locate are one-shot remote calls: no polling, no retry.
//! Failures end in a blocking alert and are logged; they never propagate.

use std::io::Write;

use async_trait::async_trait;
use colored::*;
use conformity_client::{ClientError, ComparisonClient};
use conformity_core::domain::job::SessionId;
use conformity_core::dto::locate::DocumentExcerpt;
use conformity_core::explain::{ExplanationLine, format_explanation};
use tracing::error;

use crate::render;

/// Remote operations behind the per-entry actions
#[async_trait]
pub trait EntrySource: Send + Sync {
    /// Explains a requirement; detailed when a session is known
    async fn explain(
        &self,
        requirement: &str,
        session: Option<&SessionId>,
    ) -> conformity_client::Result<String>;

    async fn locate(
        &self,
        requirement: &str,
        session: &SessionId,
    ) -> conformity_client::Result<Option<Vec<DocumentExcerpt>>>;
}

#[async_trait]
impl EntrySource for ComparisonClient {
    async fn explain(
        &self,
        requirement: &str,
        session: Option<&SessionId>,
    ) -> conformity_client::Result<String> {
        match session {
            Some(session) => self.detailed_explain(requirement, session).await,
            None => ComparisonClient::explain(self, requirement).await,
        }
    }

    async fn locate(
        &self,
        requirement: &str,
        session: &SessionId,
    ) -> conformity_client::Result<Option<Vec<DocumentExcerpt>>> {
        self.find_in_document(requirement, session).await
    }
}

/// Presentation of the per-entry actions
pub trait ActionView: Send + Sync {
    /// Shows the transient "analyzing" placeholder of an entry
    fn show_placeholder(&self, entry: usize);

    fn clear_placeholder(&self, entry: usize);

    fn show_explanation(&self, entry: usize, lines: &[ExplanationLine]);

    fn show_excerpts(&self, entry: usize, excerpts: &[DocumentExcerpt]);

    /// Blocking notice
    fn alert(&self, message: &str);
}

/// Removes the placeholder when dropped, whatever the outcome
struct Placeholder<'a> {
    view: &'a dyn ActionView,
    entry: usize,
}

impl<'a> Placeholder<'a> {
    fn show(view: &'a dyn ActionView, entry: usize) -> Self {
        view.show_placeholder(entry);
        Self { view, entry }
    }
}

impl Drop for Placeholder<'_> {
    fn drop(&mut self) {
        self.view.clear_placeholder(self.entry);
    }
}

/// Per-entry actions bound to one job
pub struct EntryActions<'a> {
    source: &'a dyn EntrySource,
    view: &'a dyn ActionView,
    session: Option<&'a SessionId>,
}

impl<'a> EntryActions<'a> {
    pub fn new(
        source: &'a dyn EntrySource,
        view: &'a dyn ActionView,
        session: Option<&'a SessionId>,
    ) -> Self {
        Self {
            source,
            view,
            session,
        }
    }

    /// Requests and renders an explanation for one entry
    ///
    /// Returns the rendered lines, or `None` when the request failed.
    pub async fn explain(&self, entry: usize, requirement: &str) -> Option<Vec<ExplanationLine>> {
        let result = {
            let _placeholder = Placeholder::show(self.view, entry);
            self.source.explain(requirement, self.session).await
        };

        match result {
            Ok(text) => {
                let lines = format_explanation(&text);
                self.view.show_explanation(entry, &lines);
                Some(lines)
            }
            Err(e) => {
                error!("Explanation request failed: {}", e);
                self.view
                    .alert(&failure_notice("Failed to get an explanation", &e));
                None
            }
        }
    }

    /// Looks an entry up in the source document
    ///
    /// Returns the excerpts shown, or `None` when nothing was found or the
    /// request failed.
    pub async fn locate(&self, entry: usize, requirement: &str) -> Option<Vec<DocumentExcerpt>> {
        let Some(session) = self.session else {
            self.view
                .alert("Document lookup needs an active comparison session");
            return None;
        };

        match self.source.locate(requirement, session).await {
            Ok(Some(excerpts)) => {
                self.view.show_excerpts(entry, &excerpts);
                Some(excerpts)
            }
            Ok(None) => {
                self.view.alert("The requirement was not found in the document");
                None
            }
            Err(e) => {
                error!("Document lookup failed: {}", e);
                self.view
                    .alert(&failure_notice("Failed to search the document", &e));
                None
            }
        }
    }
}

/// Alert text for a failed action, worded by failure class
fn failure_notice(action: &str, error: &ClientError) -> String {
    if error.is_not_found() {
        format!("{}: the comparison session is no longer known to the service", action)
    } else if error.is_server_error() {
        format!("{}: the service failed, try again later ({})", action, error)
    } else if error.is_client_error() {
        format!("{}: the service rejected the request ({})", action, error)
    } else {
        format!("{}: {}", action, error)
    }
}

/// Action view writing to the terminal
pub struct TerminalActionView;

impl ActionView for TerminalActionView {
    fn show_placeholder(&self, _entry: usize) {
        print!("{}", "Analyzing…".dimmed());
        let _ = std::io::stdout().flush();
    }

    fn clear_placeholder(&self, _entry: usize) {
        // erase the placeholder line in place
        print!("\r\x1b[2K");
        let _ = std::io::stdout().flush();
    }

    fn show_explanation(&self, entry: usize, lines: &[ExplanationLine]) {
        println!("{}", format!("Explanation for [{}]:", entry + 1).bold());
        render::print_explanation(lines);
    }

    fn show_excerpts(&self, _entry: usize, excerpts: &[DocumentExcerpt]) {
        render::print_excerpts(excerpts);
    }

    fn alert(&self, message: &str) {
        render::print_alert(message);
    }
}
