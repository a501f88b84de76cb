//! Submit command handler

use std::path::Path;

use anyhow::{Context, Result};
use colored::*;
use tracing::info;

use crate::config::Config;
use crate::store::SessionStore;

/// Upload both documents and remember the new job
pub async fn handle_submit(
    config: &Config,
    store: &dyn SessionStore,
    tz_file: &Path,
    project_file: &Path,
) -> Result<()> {
    let client = config.client()?;

    println!("{}", "Uploading documents...".dimmed());
    let session = client
        .submit_comparison(tz_file, project_file)
        .await
        .context("Failed to submit documents for comparison")?;

    store
        .set_session_id(&session)
        .context("Failed to remember the comparison session")?;
    info!("Submitted comparison, session {}", session);

    println!("{}", "✓ Documents submitted".green().bold());
    println!("  {} {}", "Session:".bold(), session);
    println!();
    println!("Follow the processing with:");
    println!("  {} conformity watch", "▸".cyan());

    Ok(())
}
