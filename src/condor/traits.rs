//! condor::traits
//!
//! JobQueue trait definition for querying a CE's job queue.
//!
//! # Design
//!
//! The `JobQueue` trait is async because queries involve network I/O.
//! Implementations bound every query by their own timeout; a timeout is
//! reported like any other failure.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::core::types::Endpoint;

/// Errors from one endpoint's job queue query.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueryError {
    /// The query tool could not be started.
    #[error("failed to run {program}: {message}")]
    Spawn {
        /// Program name
        program: String,
        /// OS error description
        message: String,
    },

    /// The query tool exited unsuccessfully.
    #[error("{program} failed{}: {stderr}", .code.map(|c| format!(" with exit code {}", c)).unwrap_or_default())]
    CommandFailed {
        /// Program name
        program: String,
        /// Exit code, if the process exited normally
        code: Option<i32>,
        /// Trimmed standard error
        stderr: String,
    },

    /// The query did not finish in time.
    #[error("{program} timed out after {timeout:?}")]
    Timeout {
        /// Program name
        program: String,
        /// Timeout that elapsed
        timeout: Duration,
    },

    /// The collector knows no scheduler.
    #[error("no schedd found in collector {pool}")]
    ScheddNotFound {
        /// Collector address
        pool: String,
    },

    /// A job record could not be read.
    #[error("unexpected job record: {0}")]
    MalformedOutput(String),

    /// A job carried a status outside the known set.
    #[error("unknown job status code {0}")]
    UnknownStatus(i64),
}

/// The JobQueue trait for enumerating a CE's jobs.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so tallies can run concurrently.
#[async_trait]
pub trait JobQueue: Send + Sync {
    /// `JobStatus` codes of every job on `endpoint` that is not a routed
    /// job.
    async fn job_statuses(&self, endpoint: &Endpoint) -> Result<Vec<i64>, QueryError>;
}
