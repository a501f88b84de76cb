//! Configuration module
//!
//! Handles CLI configuration: the comparison service URL, polling cadence,
//! how the poller reacts to transport failures, and where client-local
//! state is kept.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::ValueEnum;
use conformity_client::ComparisonClient;
use conformity_core::view::DEFAULT_MIN_SEARCH_LEN;

/// Default delay between two status polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Shortest minimum search length that may be configured
pub const MIN_SEARCH_LEN_FLOOR: usize = 2;

/// What the poller does after a status request fails in transport
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TransportErrorPolicy {
    /// Show the failure and stop polling
    Stop,
    /// Show the failure and poll again after the usual interval
    Retry,
}

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// URL of the comparison service
    pub service_url: String,

    /// Delay between two status polls
    pub poll_interval: Duration,

    /// Poller behavior on transport failures
    pub on_transport_error: TransportErrorPolicy,

    /// Minimum search input length in the report viewer
    pub min_search_len: usize,

    /// Directory holding the session file
    pub state_dir: PathBuf,

    /// Per-request timeout; `None` waits indefinitely
    pub request_timeout: Option<Duration>,
}

impl Config {
    /// Creates a new configuration with defaults
    pub fn new(service_url: String) -> Self {
        Self {
            service_url,
            poll_interval: DEFAULT_POLL_INTERVAL,
            on_transport_error: TransportErrorPolicy::Stop,
            min_search_len: DEFAULT_MIN_SEARCH_LEN,
            state_dir: default_state_dir(),
            request_timeout: None,
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.service_url.is_empty() {
            anyhow::bail!("service_url cannot be empty");
        }

        if !self.service_url.starts_with("http://") && !self.service_url.starts_with("https://") {
            anyhow::bail!("service_url must start with http:// or https://");
        }

        if self.poll_interval.is_zero() {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        if self.min_search_len < MIN_SEARCH_LEN_FLOOR {
            anyhow::bail!("min_search_len must be at least {}", MIN_SEARCH_LEN_FLOOR);
        }

        if matches!(self.request_timeout, Some(t) if t.is_zero()) {
            anyhow::bail!("request_timeout must be greater than 0");
        }

        Ok(())
    }

    /// Builds the HTTP client for the configured service
    pub fn client(&self) -> Result<ComparisonClient> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to build HTTP client")?;
        Ok(ComparisonClient::with_client(self.service_url.clone(), http))
    }

    /// Path of the session file inside the state directory
    pub fn session_file(&self) -> PathBuf {
        self.state_dir.join("session.json")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new("http://localhost:8000".to_string())
    }
}

/// Platform data directory, falling back to the working directory
fn default_state_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("conformity")
}
