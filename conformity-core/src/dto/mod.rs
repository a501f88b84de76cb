//! Data Transfer Objects for the comparison service API
//!
//! This module contains the request and response payloads exchanged with the
//! comparison server. Response shapes vary between server revisions; each DTO
//! accepts every observed variant and normalizes into one domain type so that
//! presentation code never branches on raw field presence.

pub mod compare;
pub mod explain;
pub mod job;
pub mod locate;
pub mod report;
