//! Conformity CLI
//!
//! Command-line client for the document conformity service: submits a
//! technical specification and a project document, follows the comparison
//! job, and browses the resulting compliance report.

mod actions;
mod commands;
mod config;
mod controller;
mod render;
mod store;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use colored::*;
use commands::{Commands, handle_command};
use config::{Config, TransportErrorPolicy};
use controller::ControllerError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "conformity")]
#[command(about = "Check a project document against its technical specification", long_about = None)]
struct Cli {
    /// Comparison service URL
    #[arg(
        long,
        global = true,
        env = "CONFORMITY_URL",
        default_value = "http://localhost:8000"
    )]
    url: String,

    /// Directory holding the session file
    #[arg(long, global = true, env = "CONFORMITY_STATE_DIR")]
    state_dir: Option<PathBuf>,

    /// Delay between status polls, in milliseconds
    #[arg(
        long,
        global = true,
        env = "CONFORMITY_POLL_INTERVAL_MS",
        default_value = "1000"
    )]
    poll_interval_ms: u64,

    /// What to do when a status request fails
    #[arg(
        long,
        global = true,
        value_enum,
        env = "CONFORMITY_ON_TRANSPORT_ERROR",
        default_value = "stop"
    )]
    on_transport_error: TransportErrorPolicy,

    /// Minimum length of a report search
    #[arg(
        long,
        global = true,
        env = "CONFORMITY_MIN_SEARCH_LEN",
        default_value = "3"
    )]
    min_search_len: usize,

    /// Per-request timeout in seconds; no timeout by default
    #[arg(long, global = true, env = "CONFORMITY_REQUEST_TIMEOUT_SECS")]
    request_timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn config(&self) -> Config {
        let mut config = Config::new(self.url.trim_end_matches('/').to_string());
        config.poll_interval = Duration::from_millis(self.poll_interval_ms);
        config.on_transport_error = self.on_transport_error;
        config.min_search_len = self.min_search_len;
        config.request_timeout = self.request_timeout_secs.map(Duration::from_secs);
        if let Some(dir) = &self.state_dir {
            config.state_dir = dir.clone();
        }
        config
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr, away from rendered output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "conformity=warn,conformity_client=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(&e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = cli.config();
    config.validate()?;
    handle_command(cli.command, &config).await
}

fn report_error(error: &anyhow::Error) {
    if let Some(ControllerError::NoActiveJob) = error.downcast_ref::<ControllerError>() {
        eprintln!("{}", "No comparison in progress.".yellow());
        eprintln!("Submit documents first:");
        eprintln!("  {} conformity submit <TZ_FILE> <PROJECT_FILE>", "▸".cyan());
        return;
    }
    eprintln!("{} {:#}", "Error:".red().bold(), error);
}
