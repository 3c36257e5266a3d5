//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--config <path>`: Settings file to load instead of the standard locations
//! - `--repo`, `--branch`: Factory repository and branch
//! - `--registry-url`: Registry base URL
//! - `--all-entries`: Include non-production factory documents
//! - `--skip-malformed`: Skip factory documents that fail to parse
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Errors only

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::core::config::Overrides;
use crate::ui::output::Verbosity;

/// ce-census - Census of HTCondor-CEs and their job queues
#[derive(Parser, Debug)]
#[command(name = "ce-census")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Settings file to load
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Factory configuration repository (URL or local path)
    #[arg(long, global = true, value_name = "URL")]
    pub repo: Option<String>,

    /// Branch of the factory repository
    #[arg(long, global = true)]
    pub branch: Option<String>,

    /// Base URL of the PanDA queue registry
    #[arg(long, global = true, value_name = "URL")]
    pub registry_url: Option<String>,

    /// Include non-production (ITB) factory documents
    #[arg(long, global = true)]
    pub all_entries: bool,

    /// Skip factory documents that fail to parse instead of aborting
    #[arg(long, global = true)]
    pub skip_malformed: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Errors only
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }

    /// Settings overrides from the global flags.
    pub fn overrides(&self) -> Overrides {
        Overrides {
            repository: self.repo.clone(),
            branch: self.branch.clone(),
            registry_url: self.registry_url.clone(),
            all_entries: self.all_entries,
            skip_malformed: self.skip_malformed,
        }
    }

    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.debug)
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Tally the job queue of every known HTCondor-CE
    #[command(
        name = "jobs",
        long_about = "Tally the job queue of every known HTCondor-CE.\n\n\
            Endpoints are the union of the factory configuration at the tip of \
            the configured branch and the registry's active production CEs. \
            Writes one CSV row per endpoint. An endpoint that cannot be queried \
            gets zero counts and a COMMUNICATION_ERROR."
    )]
    Jobs {
        /// Use factory endpoints only
        #[arg(long)]
        no_registry: bool,

        /// Continue with factory endpoints if the registry is unavailable
        #[arg(long, conflicts_with = "no_registry")]
        allow_registry_failure: bool,
    },

    /// List known HTCondor-CE endpoints
    #[command(name = "endpoints")]
    Endpoints {
        /// Which sources to consult
        #[arg(long, value_enum, default_value_t = Source::All)]
        source: Source,

        /// Print the registry's endpoints as SITE,HOSTNAME rows
        #[arg(long, conflicts_with = "source")]
        by_site: bool,
    },

    /// Count HTCondor-CEs in the factory configuration month by month
    #[command(
        name = "history",
        long_about = "Count active production HTCondor-CEs in the factory \
            configuration month by month.\n\n\
            Each probe date is resolved to the last first-parent commit before \
            local midnight of that date. Writes MONTH,HTCONDOR_CE_COUNT rows."
    )]
    History {
        /// First probe date (YYYY-MM-DD)
        #[arg(long, value_name = "DATE")]
        since: Option<NaiveDate>,

        /// Stop before this date (YYYY-MM-DD, default today)
        #[arg(long, value_name = "DATE")]
        until: Option<NaiveDate>,
    },

    /// Print the effective settings as TOML
    #[command(name = "config")]
    Config,

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        after_help = "\
EXAMPLES:
    # Bash (add to ~/.bashrc)
    ce-census completion bash >> ~/.bashrc

    # Zsh (add to ~/.zshrc)
    ce-census completion zsh >> ~/.zshrc

    # Fish
    ce-census completion fish > ~/.config/fish/completions/ce-census.fish"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Endpoint sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Source {
    /// Factory configuration only
    Config,
    /// Registry only
    Registry,
    /// Union of both
    All,
}

/// Shells for completion scripts.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
