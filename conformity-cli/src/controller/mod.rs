//! Processing controller
//!
//! Drives a submitted job from `Polling` to a terminal state, keeping a
//! presentation layer informed at every step. One controller tracks exactly
//! one job; it owns its collaborators and is stopped explicitly through
//! [`ProcessingController::teardown`].

pub mod poller;
pub mod view;

pub use poller::{ControllerError, PollOutcome, PollState, ProcessingController};
pub use view::TerminalStatusView;
