//! Conformity Core
//!
//! Core types and abstractions for the Conformity document-comparison client.
//!
//! This crate contains:
//! - Domain types: Jobs, status snapshots, compliance report entries
//! - DTOs: Wire payloads of the comparison service, normalized into domain types
//! - View: The report view model and its client-side search
//! - Explain: Formatting of free-text explanations into labeled lines

pub mod domain;
pub mod dto;
pub mod explain;
pub mod view;
