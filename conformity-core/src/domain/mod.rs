//! Core domain types
//!
//! This module contains the domain structures shared by the HTTP client and
//! the terminal front end. Wire-level variations are resolved before values
//! reach these types (see [`crate::dto`]).

pub mod job;
pub mod report;
