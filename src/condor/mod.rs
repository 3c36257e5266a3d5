//! condor
//!
//! Job queue tallies for HTCondor-CEs.
//!
//! # Architecture
//!
//! The `JobQueue` trait is the seam between the census and a CE's job
//! queue. [`cli::CondorCli`] implements it with the HTCondor command-line
//! tools; [`mock::MockJobQueue`] serves canned answers in tests.
//! [`collect`] turns query results into per-endpoint tallies and keeps one
//! endpoint's failure from affecting the others.
//!
//! # Modules
//!
//! - `traits`: `JobQueue` trait and `QueryError`
//! - [`status`]: `JobStatus` codes and `JobTally`
//! - [`cli`]: HTCondor command-line backend
//! - [`mock`]: Mock implementation for deterministic testing
//! - [`collect`]: Failure-isolating collectors

pub mod cli;
pub mod collect;
pub mod mock;
pub mod status;
mod traits;

pub use cli::CondorCli;
pub use collect::{collect_all, collect_tally, EndpointTally};
pub use status::{JobStatus, JobTally};
pub use traits::*;
