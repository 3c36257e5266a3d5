//! cli
//!
//! Command-line interface layer for ce-census.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Install the diagnostic log
//! - Load settings and apply flag overrides
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap and dispatches to
//! handlers that call into [`crate::engine`] and write reports through
//! [`crate::ui::report`].

pub mod args;
pub mod commands;

pub use args::{Cli, Shell, Source};

use anyhow::{Context, Result};

use crate::core::config::Config;
use crate::ui::output;

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();
    output::init_tracing(cli.verbosity());

    // Completion runs without settings.
    if let args::Command::Completion { shell } = cli.command {
        return commands::completion(shell);
    }

    let mut config = Config::load(cli.config.as_deref()).context("failed to load settings")?;
    config
        .apply(&cli.overrides())
        .context("invalid command-line setting")?;

    commands::dispatch(cli.command, &config)
}
