//! ce-census - Census of HTCondor-CEs and their job queues
//!
//! ce-census finds every active production HTCondor-CE known to the
//! GlideinWMS pilot factories and to the PanDA queue registry, tallies the
//! jobs on each CE, and counts factory CEs month by month over the factory
//! configuration history.
//!
//! # Architecture
//!
//! The codebase follows a layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to engine)
//! - [`engine`] - Endpoint discovery, reconciliation and the historical series
//! - [`core`] - Domain types and settings
//! - [`git`] - Single interface for all Git operations
//! - [`factory`] - Factory configuration snapshots and endpoint extraction
//! - [`registry`] - Abstraction for live endpoint registries (PanDA)
//! - [`condor`] - Job queue queries and per-endpoint tallies
//! - [`ui`] - Diagnostic log and CSV reports
//!
//! # Correctness Invariants
//!
//! 1. Endpoints from every source are normalized the same way before they
//!    are compared
//! 2. A repository snapshot never outlives its scope, on success or error
//! 3. One endpoint's failed query never affects another endpoint's tally

pub mod cli;
pub mod condor;
pub mod core;
pub mod engine;
pub mod factory;
pub mod git;
pub mod registry;
pub mod ui;
