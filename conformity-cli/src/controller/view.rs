//! Presentation seam of the processing controller

use std::io::Write;
use std::sync::Mutex;

use colored::*;
use conformity_core::domain::job::{ComplianceSummary, SessionId};

use crate::render;
use crate::store::Theme;

/// Visibility of the actions offered once a job completes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actions {
    pub download: bool,
    pub view_report: bool,
}

impl Actions {
    pub const HIDDEN: Actions = Actions {
        download: false,
        view_report: false,
    };

    pub const ENABLED: Actions = Actions {
        download: true,
        view_report: true,
    };
}

/// Receives every state change of the poller
///
/// Implementations must not block; the poller calls them inline.
pub trait StatusView: Send + Sync {
    fn show_progress(&self, progress: f64);

    fn show_completed(&self, summary: Option<&ComplianceSummary>);

    fn show_failure(&self, message: &str);

    /// Shows or hides the actions bound to `session`
    fn set_actions(&self, session: &SessionId, actions: Actions);
}

/// Status view writing to the terminal
pub struct TerminalStatusView {
    theme: Theme,
    /// Last rendered action set, to avoid repeating the hint every poll
    actions: Mutex<Actions>,
}

impl TerminalStatusView {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            actions: Mutex::new(Actions::HIDDEN),
        }
    }
}

impl StatusView for TerminalStatusView {
    fn show_progress(&self, progress: f64) {
        print!("\r{} {:>3.0}%", "Processing:".bold(), progress);
        let _ = std::io::stdout().flush();
    }

    fn show_completed(&self, summary: Option<&ComplianceSummary>) {
        println!("\r{}", "✓ Processing complete!".green().bold());
        if let Some(summary) = summary {
            render::print_summary(summary, self.theme);
        }
    }

    fn show_failure(&self, message: &str) {
        println!("\r{} {}", "✗ Error:".red().bold(), message.red());
    }

    fn set_actions(&self, session: &SessionId, actions: Actions) {
        let mut current = self.actions.lock().unwrap_or_else(|e| e.into_inner());
        if *current == actions {
            return;
        }
        *current = actions;

        if actions.download {
            println!("  {} conformity download --session {}", "▸".cyan(), session);
        }
        if actions.view_report {
            println!("  {} conformity report --session {}", "▸".cyan(), session);
        }
    }
}
