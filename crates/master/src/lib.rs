//! # Strata Master
//!
//! Dependency tracking and master coordination for Strata: the generic
//! dependency DAG, lineage manifests planned on top of it, and the client
//! workers use to talk to the file system master.

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![deny(clippy::expect_used)]

pub use strata_core::{Error, Result};

/// Retrying client for the file system master
pub mod client;

/// Generic dependency DAG
pub mod dag;

/// Lineage manifests and execution planning
pub mod lineage;
