//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Builds its sources from the effective settings
//! 2. Calls the engine
//! 3. Writes its report to stdout
//!
//! # Async Commands
//!
//! Commands that query the registry or the CEs are async because they
//! involve network I/O. Their handlers create a tokio runtime and block on
//! the async part. Repository work stays outside the runtime.

mod completion;
mod config_cmd;
mod endpoints;
mod history;
mod jobs;

// Re-export command functions for testing and direct invocation
pub use completion::completion;
pub use config_cmd::config;
pub use endpoints::endpoints;
pub use history::history;
pub use jobs::jobs;

use anyhow::{Context, Result};

use crate::cli::args::Command;
use crate::condor::CondorCli;
use crate::core::config::Config;
use crate::registry::PandaRegistry;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, config: &Config) -> Result<()> {
    match command {
        Command::Jobs {
            no_registry,
            allow_registry_failure,
        } => jobs::jobs(config, no_registry, allow_registry_failure),
        Command::Endpoints { source, by_site } => endpoints::endpoints(config, source, by_site),
        Command::History { since, until } => history::history(config, since, until),
        Command::Config => config_cmd::config(config),
        Command::Completion { shell } => completion::completion(shell),
    }
}

/// Registry client for the configured URL.
fn panda_registry(config: &Config) -> Result<PandaRegistry> {
    PandaRegistry::new(config.registry_url(), config.registry_timeout())
        .context("failed to create registry client")
}

/// Job queue backend for the configured collector settings.
fn condor_cli(config: &Config) -> CondorCli {
    CondorCli::new(config.collector_port(), config.collector_timeout())
        .with_programs(config.condor_q(), config.condor_status())
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new().context("failed to start async runtime")
}
