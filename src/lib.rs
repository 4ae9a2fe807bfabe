#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

//! # Strata
//!
//! Command-line front end for the Strata workspace crates.

pub use strata_core;
pub use strata_master;

pub mod cli;
pub mod commands;
