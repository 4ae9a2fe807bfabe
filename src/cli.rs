//! CLI command definitions using clap.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

/// Strata - lineage planning for a tiered file system
#[derive(Parser, Debug)]
#[command(name = "strata")]
#[command(version)]
#[command(about = "Plan lineage jobs in dependency order and inspect master configuration")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the execution order of a lineage manifest
    Plan {
        /// Manifest file (.toml, otherwise JSON)
        #[arg(short, long)]
        manifest: PathBuf,

        /// Jobs to plan; repeat for several. Defaults to every job
        #[arg(short, long)]
        target: Vec<String>,

        /// Print the dependency graph as Graphviz DOT instead
        #[arg(long, default_value_t = false)]
        dot: bool,
    },

    /// Validate and print the effective configuration
    Config {
        /// Configuration file; defaults are used when omitted
        #[arg(short, long)]
        path: Option<PathBuf>,
    },
}

impl Commands {
    /// Configuration file named on the command line, if any.
    #[must_use]
    pub fn config_path(&self) -> Option<&Path> {
        match self {
            Self::Config { path } => path.as_deref(),
            Self::Plan { .. } => None,
        }
    }
}
