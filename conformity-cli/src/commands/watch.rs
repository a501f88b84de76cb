//! Watch command handler
//!
//! Runs the processing controller for the tracked job in the foreground.
//! The controller is always torn down on exit, which forgets the job.

use std::future::Future;
use std::io;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use conformity_core::domain::job::JobStatus;
use tracing::{debug, warn};

use crate::commands::report;
use crate::config::Config;
use crate::controller::{PollOutcome, PollState, ProcessingController, TerminalStatusView};
use crate::store::{SessionStore, Theme};

pub async fn handle_watch(
    config: &Config,
    store: Arc<dyn SessionStore>,
    theme: Theme,
    open_report: bool,
) -> Result<()> {
    let client = Arc::new(config.client()?);
    let view = Arc::new(TerminalStatusView::new(theme));
    let controller = ProcessingController::new(config, client.clone(), view, store);

    let handle = controller.start()?;
    let session = handle.session().clone();

    let interrupt = async {
        let result = tokio::signal::ctrl_c().await;
        if let Err(e) = &result {
            warn!("Cannot listen for Ctrl-C: {}", e);
        }
        result
    };
    let outcome = until_interrupted(handle.wait(), interrupt).await;

    debug!("Polling of session {} ended in {:?}", session, controller.state());
    if let Err(e) = controller.teardown() {
        warn!("Failed to forget session {}: {}", session, e);
    }

    match outcome.state {
        PollState::Completed => {
            if open_report {
                let entries = match outcome.status {
                    Some(JobStatus::Completed {
                        report: Some(entries),
                        ..
                    }) => entries,
                    _ => client
                        .get_report(&session)
                        .await
                        .context("Failed to fetch the report")?,
                };
                report::run_viewer(config, &client, &session, theme, entries).await?;
            }
            Ok(())
        }
        PollState::Failed => bail!("processing of session {} did not complete", session),
        PollState::Idle | PollState::Polling => {
            println!("Stopped watching session {}", session);
            Ok(())
        }
    }
}

/// Waits for polling to stop, or for the user to interrupt it
///
/// A failed interrupt listener is ignored and polling keeps going.
async fn until_interrupted(
    polling: impl Future<Output = PollOutcome>,
    interrupt: impl Future<Output = io::Result<()>>,
) -> PollOutcome {
    tokio::select! {
        outcome = polling => outcome,
        Ok(()) = interrupt => {
            println!();
            PollOutcome::cancelled()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn completed() -> PollOutcome {
        PollOutcome {
            state: PollState::Completed,
            status: None,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_interrupt_cancels_polling() {
        let polling = std::future::pending::<PollOutcome>();
        let outcome = until_interrupted(polling, async { Ok(()) }).await;
        assert_eq!(outcome, PollOutcome::cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_interrupt_listener_keeps_polling() {
        let polling = async {
            tokio::time::sleep(Duration::from_secs(3)).await;
            completed()
        };
        let interrupt = async { Err(io::Error::other("no signal driver")) };

        let outcome = until_interrupted(polling, interrupt).await;
        assert_eq!(outcome.state, PollState::Completed);
    }
}
