//! factory::snapshot
//!
//! An exclusively owned working copy of the factory repository, pinned to
//! one commit at a time.
//!
//! # Lifecycle
//!
//! [`RepositorySnapshot::clone_from`] clones into a fresh temporary
//! directory and reads the first-parent history of the configured branch
//! once. Each [`RepositorySnapshot::checkout_at_date`] moves the same
//! working copy to another commit; nothing is re-cloned. Dropping the
//! snapshot removes the directory and everything in it, on success and on
//! error alike.
//!
//! Callers that need two commits checked out at once use two snapshots.
//!
//! # Example
//!
//! ```ignore
//! use ce_census::factory::RepositorySnapshot;
//! use chrono::NaiveDate;
//!
//! let mut snapshot = RepositorySnapshot::clone_from(url, "master")?;
//! snapshot.checkout_at_date(NaiveDate::from_ymd_opt(2018, 1, 1).unwrap())?;
//! let endpoints = extract_endpoints(snapshot.path(), true, OnMalformed::Fail)?;
//! ```

use std::path::Path;

use chrono::NaiveDate;
use tempfile::TempDir;
use thiserror::Error;
use tracing::{debug, info};

use super::timeline::Timeline;
use crate::core::types::CommitRef;
use crate::git::{Git, GitError};

/// Errors from snapshot resolution.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The repository could not be cloned or read.
    #[error("repository unavailable: {url}: {source}")]
    RepositoryUnavailable {
        url: String,
        #[source]
        source: GitError,
    },

    /// The configured branch has no commits.
    #[error("branch '{branch}' has no history")]
    EmptyHistory { branch: String },

    /// Moving the working copy to a commit failed.
    #[error("failed to check out {commit}: {source}")]
    CheckoutFailed {
        commit: String,
        #[source]
        source: GitError,
    },

    /// The temporary directory could not be created.
    #[error("failed to create snapshot directory: {0}")]
    TempDir(#[source] std::io::Error),
}

/// A repository working copy owned by this value.
#[derive(Debug)]
pub struct RepositorySnapshot {
    // Field order matters: the repository handle is released before the
    // directory is removed.
    git: Git,
    timeline: Timeline,
    head: CommitRef,
    dir: TempDir,
}

impl RepositorySnapshot {
    /// Clone `url` and check out the tip of `branch`.
    ///
    /// # Errors
    ///
    /// - [`SnapshotError::RepositoryUnavailable`] if cloning or reading
    ///   history fails
    /// - [`SnapshotError::EmptyHistory`] if the branch has no commits
    pub fn clone_from(url: &str, branch: &str) -> Result<Self, SnapshotError> {
        let dir = tempfile::Builder::new()
            .prefix("ce-census-")
            .tempdir()
            .map_err(SnapshotError::TempDir)?;

        info!(repository = %url, branch = %branch, "cloning factory repository");
        let unavailable = |source| SnapshotError::RepositoryUnavailable {
            url: url.to_string(),
            source,
        };
        let git = Git::clone_branch(url, dir.path(), branch).map_err(unavailable)?;
        let history = git.first_parent_history(branch).map_err(unavailable)?;
        debug!(commits = history.len(), "read first-parent history");

        let timeline = Timeline::new(history).ok_or_else(|| SnapshotError::EmptyHistory {
            branch: branch.to_string(),
        })?;
        let head = timeline.latest().commit.clone();

        let mut snapshot = Self {
            git,
            timeline,
            head,
            dir,
        };
        snapshot.checkout(snapshot.head.clone())?;
        Ok(snapshot)
    }

    /// Root of the working copy.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// The commit currently checked out.
    pub fn head(&self) -> &CommitRef {
        &self.head
    }

    /// The indexed first-parent history.
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Check out the commit that was current at local midnight of `date`.
    ///
    /// Dates before the repository's first commit select that first commit;
    /// dates past the tip select the tip.
    pub fn checkout_at_date(&mut self, date: NaiveDate) -> Result<&CommitRef, SnapshotError> {
        let commit = self.timeline.resolve_date(date).clone();
        debug!(%date, commit = %commit.short(10), "resolved date");
        self.checkout(commit)?;
        Ok(&self.head)
    }

    /// Check out the tip of the branch.
    pub fn checkout_latest(&mut self) -> Result<&CommitRef, SnapshotError> {
        let commit = self.timeline.latest().commit.clone();
        self.checkout(commit)?;
        Ok(&self.head)
    }

    fn checkout(&mut self, commit: CommitRef) -> Result<(), SnapshotError> {
        self.git
            .checkout_detached(&commit)
            .map_err(|source| SnapshotError::CheckoutFailed {
                commit: commit.to_string(),
                source,
            })?;
        self.head = commit;
        Ok(())
    }
}
