//! CLI command handlers.
//!
//! Handlers return the text to print so `main` owns stdout.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

use std::path::Path;

use anyhow::{Context, Result};
use petgraph::dot::{Config, Dot};
use strata_core::Configuration;
use strata_master::lineage::LineageManifest;
use tracing::info;

use crate::cli::Commands;

/// Load and validate the configuration at `path`, or the defaults.
pub fn load_configuration(path: Option<&Path>) -> Result<Configuration> {
    let config = match path {
        Some(path) => Configuration::load(path)
            .with_context(|| format!("Failed to load configuration {}", path.display()))?,
        None => Configuration::default(),
    };
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// `EnvFilter` directive for the subscriber: a non-blank `RUST_LOG` value wins,
/// otherwise the configured `log_filter`.
#[must_use]
pub fn log_directive(env_filter: Option<&str>, config: &Configuration) -> String {
    env_filter
        .map(str::trim)
        .filter(|directive| !directive.is_empty())
        .unwrap_or(config.log_filter.as_str())
        .to_string()
}

/// Execute a CLI command against the loaded configuration and return its output.
pub fn execute_command(command: Commands, config: &Configuration) -> Result<String> {
    match command {
        Commands::Plan {
            manifest,
            target,
            dot,
        } => cmd_plan(&manifest, &target, dot),
        Commands::Config { .. } => cmd_config(config),
    }
}

fn cmd_plan(manifest: &Path, targets: &[String], dot: bool) -> Result<String> {
    let lineage = LineageManifest::load(manifest)
        .with_context(|| format!("Failed to load manifest {}", manifest.display()))?;

    if dot {
        let graph = lineage
            .build_dag()
            .context("Manifest does not form a valid dependency graph")?
            .to_digraph()
            .map(|_, job| job.clone(), |_, _| "");
        return Ok(Dot::with_config(&graph, &[Config::EdgeNoLabel]).to_string());
    }

    let plan = lineage
        .execution_plan(targets)
        .context("Failed to plan the requested jobs")?;
    info!(jobs = plan.len(), "execution plan ready");
    Ok(plan.iter().map(|id| format!("{id}\n")).collect())
}

fn cmd_config(config: &Configuration) -> Result<String> {
    info!(master = %config.master_address, "configuration valid");
    Ok(config.to_toml_string()?)
}
