//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod download;
mod explain;
mod report;
mod submit;
mod theme;
mod watch;

pub use theme::ThemeCommands;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Subcommand;
use conformity_core::domain::job::SessionId;
use tracing::debug;

use crate::config::Config;
use crate::controller::ControllerError;
use crate::store::{FileSessionStore, InMemorySessionStore, SessionStore};

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Submit a specification and a project document for comparison
    Submit {
        /// Technical specification (ТЗ) document
        tz_file: PathBuf,

        /// Project document checked against the specification
        project_file: PathBuf,
    },
    /// Follow the processing of a comparison job
    Watch {
        /// Session to follow instead of the remembered one
        #[arg(long)]
        session: Option<String>,

        /// Open the report viewer once processing completes
        #[arg(long)]
        open_report: bool,
    },
    /// Browse the compliance report of a completed job
    Report {
        #[arg(long)]
        session: Option<String>,

        /// Print the entries matching this term and exit
        #[arg(long)]
        search: Option<String>,
    },
    /// Explain why a requirement is (not) met
    Explain {
        /// Requirement text as shown in the report
        requirement: String,

        #[arg(long)]
        session: Option<String>,
    },
    /// Find a requirement in the source document
    Locate {
        requirement: String,

        #[arg(long)]
        session: Option<String>,
    },
    /// Download the report document
    Download {
        #[arg(long)]
        session: Option<String>,

        /// Directory the report is written to
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },
    /// Show or change the color theme
    Theme {
        #[command(subcommand)]
        command: Option<ThemeCommands>,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    let store = FileSessionStore::new(config.session_file());
    debug!("Using session file {}", store.path().display());

    match command {
        Commands::Submit {
            tz_file,
            project_file,
        } => submit::handle_submit(config, &store, &tz_file, &project_file).await,
        Commands::Watch {
            session,
            open_report,
        } => {
            let theme = store.theme()?;
            let tracked: Arc<dyn SessionStore> = match parse_session(session)? {
                Some(id) => Arc::new(InMemorySessionStore::with_session(id)),
                None => Arc::new(store),
            };
            watch::handle_watch(config, tracked, theme, open_report).await
        }
        Commands::Report { session, search } => {
            let session = resolve_session(&store, session)?;
            report::handle_report(config, &session, store.theme()?, search).await
        }
        Commands::Explain {
            requirement,
            session,
        } => {
            // the simple explanation needs no job
            let session = match parse_session(session)? {
                Some(id) => Some(id),
                None => store.session_id()?,
            };
            explain::handle_explain(config, &requirement, session.as_ref()).await
        }
        Commands::Locate {
            requirement,
            session,
        } => {
            let session = resolve_session(&store, session)?;
            explain::handle_locate(config, &requirement, &session).await
        }
        Commands::Download { session, out } => {
            let session = resolve_session(&store, session)?;
            download::handle_download(config, &session, &out).await
        }
        Commands::Theme { command } => theme::handle_theme_command(command, &store),
    }
}

/// Parses an explicitly given session id
fn parse_session(raw: Option<String>) -> Result<Option<SessionId>> {
    match raw {
        Some(raw) => SessionId::parse(raw)
            .map(Some)
            .ok_or_else(|| anyhow::anyhow!("session id cannot be empty")),
        None => Ok(None),
    }
}

/// The explicit session, else the remembered one
fn resolve_session(store: &dyn SessionStore, explicit: Option<String>) -> Result<SessionId> {
    if let Some(id) = parse_session(explicit)? {
        return Ok(id);
    }
    store
        .session_id()?
        .ok_or_else(|| ControllerError::NoActiveJob.into())
}
