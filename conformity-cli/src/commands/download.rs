//! Download command handler

use std::path::Path;

use anyhow::{Context, Result};
use colored::*;
use conformity_client::ComparisonClient;
use conformity_core::domain::job::SessionId;
use tracing::info;

use crate::config::Config;

pub async fn handle_download(config: &Config, session: &SessionId, out: &Path) -> Result<()> {
    let client = config.client()?;
    download_to(&client, session, out).await
}

/// Save the report document of `session` under `out`
pub(crate) async fn download_to(
    client: &ComparisonClient,
    session: &SessionId,
    out: &Path,
) -> Result<()> {
    let path = client
        .save_report(session, out)
        .await
        .context("Failed to download the report")?;

    info!("Report of session {} saved to {}", session, path.display());
    println!(
        "{} {}",
        "✓ Report saved to".green(),
        path.display().to_string().bold()
    );
    Ok(())
}
