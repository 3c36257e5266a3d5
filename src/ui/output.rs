//! ui::output
//!
//! Diagnostic output.
//!
//! # Design
//!
//! Reports go to stdout; everything else is a `tracing` event written to
//! stderr, so stdout stays a clean CSV stream. The verbosity flags pick the
//! default filter and `RUST_LOG` overrides it.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - errors only
    Quiet,
    /// Normal mode - progress at info level
    Normal,
    /// Debug mode - verbose output
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }

    /// Default filter directive for this verbosity.
    ///
    /// Dependencies stay at `warn` unless quiet.
    pub fn directive(self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "warn,ce_census=info",
            Verbosity::Debug => "warn,ce_census=debug",
        }
    }
}

/// Install the global subscriber, writing to stderr.
///
/// Only the first call takes effect.
pub fn init_tracing(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.directive()));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init()
        .ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_from_flags() {
        assert_eq!(Verbosity::from_flags(false, false), Verbosity::Normal);
        assert_eq!(Verbosity::from_flags(true, false), Verbosity::Quiet);
        assert_eq!(Verbosity::from_flags(false, true), Verbosity::Debug);
        // Quiet takes precedence
        assert_eq!(Verbosity::from_flags(true, true), Verbosity::Quiet);
    }

    #[test]
    fn directives_parse() {
        for verbosity in [Verbosity::Quiet, Verbosity::Normal, Verbosity::Debug] {
            assert!(EnvFilter::try_new(verbosity.directive()).is_ok());
        }
    }
}
