//! ui
//!
//! User-facing output.
//!
//! # Modules
//!
//! - [`output`] - Verbosity and the diagnostic log on stderr
//! - [`report`] - CSV reports on stdout

pub mod output;
pub mod report;
