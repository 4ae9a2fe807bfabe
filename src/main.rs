//! # Strata
//!
//! Entry point for the `strata` binary. Parses the command line, loads the
//! configuration, installs the tracing subscriber, and prints whatever the
//! command produced. Logs go to stderr so command output can be piped.

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![deny(clippy::expect_used)]

use anyhow::Result;
use clap::Parser;
use tracing::{debug, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use strata::cli::Cli;
use strata::commands::{execute_command, load_configuration, log_directive};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_configuration(cli.command.config_path())?;

    let env_filter = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    init_tracing(&log_directive(env_filter.as_deref(), &config));
    debug!(command = ?cli.command, "dispatching");

    let output = execute_command(cli.command, &config)?;
    print!("{output}");
    Ok(())
}

/// Initialize tracing subscriber.
fn init_tracing(directive: &str) {
    let (filter, rejected) = match EnvFilter::try_new(directive) {
        Ok(filter) => (filter, None),
        Err(e) => (EnvFilter::new("info"), Some(e)),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Some(e) = rejected {
        warn!(directive, error = %e, "invalid log filter, using info");
    }
}
