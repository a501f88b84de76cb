//! Explain and locate command handlers
//!
//! One-shot versions of the per-entry report actions.

use anyhow::{Result, bail};
use conformity_core::domain::job::SessionId;

use crate::actions::{EntryActions, TerminalActionView};
use crate::config::Config;

pub async fn handle_explain(
    config: &Config,
    requirement: &str,
    session: Option<&SessionId>,
) -> Result<()> {
    let client = config.client()?;
    let view = TerminalActionView;
    let actions = EntryActions::new(&client, &view, session);

    if actions.explain(0, requirement).await.is_none() {
        bail!("no explanation available");
    }
    Ok(())
}

pub async fn handle_locate(config: &Config, requirement: &str, session: &SessionId) -> Result<()> {
    let client = config.client()?;
    let view = TerminalActionView;
    let actions = EntryActions::new(&client, &view, Some(session));

    if actions.locate(0, requirement).await.is_none() {
        bail!("requirement not located");
    }
    Ok(())
}
