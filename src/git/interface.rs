//! git::interface
//!
//! Git interface implementation using git2.
//!
//! This module provides the **single doorway** to all Git operations in
//! ce-census. All repository interactions flow through this interface,
//! which provides structured results and normalizes errors into typed
//! failure categories.
//!
//! # Operations
//!
//! The census needs very little from Git:
//! - clone a repository into a directory it owns
//! - list the first-parent history of one branch with commit times
//! - check out an arbitrary commit of that history (detached)
//!
//! # Example
//!
//! ```ignore
//! use ce_census::git::Git;
//! use std::path::Path;
//!
//! let git = Git::clone_branch("https://github.com/org/repo", Path::new("/tmp/x"), "master")?;
//! let history = git.first_parent_history("master")?;
//! git.checkout_detached(&history[0].commit)?;
//! ```

use std::path::Path;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::core::types::{CommitRef, TypeError};

/// Errors from Git operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// Cloning failed.
    #[error("failed to clone {url}: {message}")]
    CloneFailed {
        /// The URL or path being cloned
        url: String,
        /// The git2 error message
        message: String,
    },

    /// Requested ref does not exist.
    #[error("ref not found: {refname}")]
    RefNotFound {
        /// The ref that was not found
        refname: String,
    },

    /// Object not found in repository.
    #[error("object not found: {oid}")]
    ObjectNotFound {
        /// The OID that was not found
        oid: String,
    },

    /// Invalid object id format.
    #[error("invalid object id: {oid}")]
    InvalidOid {
        /// The invalid OID string
        oid: String,
    },

    /// Internal git2 error.
    #[error("git error: {message}")]
    Internal {
        /// The error message
        message: String,
    },
}

impl GitError {
    /// Create a GitError from a git2::Error with richer context.
    fn from_git2(err: git2::Error, context: &str) -> Self {
        match err.code() {
            git2::ErrorCode::NotFound => {
                if context.starts_with("refs/") {
                    GitError::RefNotFound {
                        refname: context.to_string(),
                    }
                } else {
                    GitError::ObjectNotFound {
                        oid: context.to_string(),
                    }
                }
            }
            git2::ErrorCode::InvalidSpec => GitError::InvalidOid {
                oid: context.to_string(),
            },
            _ => GitError::Internal {
                message: format!("{}: {}", context, err.message()),
            },
        }
    }
}

impl From<git2::Error> for GitError {
    fn from(err: git2::Error) -> Self {
        GitError::Internal {
            message: err.message().to_string(),
        }
    }
}

impl From<TypeError> for GitError {
    fn from(err: TypeError) -> Self {
        GitError::InvalidOid {
            oid: err.to_string(),
        }
    }
}

/// One commit of a first-parent history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitStamp {
    /// The commit id
    pub commit: CommitRef,
    /// Committer timestamp
    pub time: DateTime<Utc>,
}

/// The Git interface.
///
/// This is the **single point of interaction** with Git. No other module
/// imports `git2`.
pub struct Git {
    /// The underlying git2 repository
    repo: git2::Repository,
}

impl std::fmt::Debug for Git {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Git")
            .field("path", &self.repo.path())
            .finish()
    }
}

impl Git {
    // =========================================================================
    // Cloning
    // =========================================================================

    /// Clone `url` into `dest`, checking out `branch`.
    ///
    /// `url` may be a remote URL or a local path. `dest` must be empty or
    /// not exist yet.
    ///
    /// # Errors
    ///
    /// - [`GitError::CloneFailed`] if the clone fails for any reason,
    ///   including a missing branch
    pub fn clone_branch(url: &str, dest: &Path, branch: &str) -> Result<Self, GitError> {
        let repo = git2::build::RepoBuilder::new()
            .branch(branch)
            .clone(url, dest)
            .map_err(|e| GitError::CloneFailed {
                url: url.to_string(),
                message: e.message().to_string(),
            })?;

        Ok(Self { repo })
    }

    // =========================================================================
    // History
    // =========================================================================

    /// Resolve a branch name to its tip commit.
    ///
    /// Local branches take precedence over `origin` remote-tracking
    /// branches.
    pub fn resolve_branch(&self, branch: &str) -> Result<CommitRef, GitError> {
        let local = format!("refs/heads/{}", branch);
        let remote = format!("refs/remotes/origin/{}", branch);

        for refname in [&local, &remote] {
            match self.repo.refname_to_id(refname) {
                Ok(oid) => return Ok(CommitRef::new(oid.to_string())?),
                Err(e) if e.code() == git2::ErrorCode::NotFound => continue,
                Err(e) => return Err(GitError::from_git2(e, refname)),
            }
        }

        Err(GitError::RefNotFound { refname: local })
    }

    /// List the first-parent history of `branch`, oldest commit first.
    ///
    /// Side branches brought in by merges are not visited.
    pub fn first_parent_history(&self, branch: &str) -> Result<Vec<CommitStamp>, GitError> {
        let tip = self.resolve_branch(branch)?;
        let tip_oid = git2::Oid::from_str(tip.as_str())
            .map_err(|e| GitError::from_git2(e, tip.as_str()))?;

        let mut revwalk = self.repo.revwalk()?;
        revwalk.push(tip_oid)?;
        revwalk.simplify_first_parent()?;

        let mut history = Vec::new();
        for oid in revwalk {
            let oid = oid?;
            let commit = self
                .repo
                .find_commit(oid)
                .map_err(|e| GitError::from_git2(e, &oid.to_string()))?;
            let time = DateTime::from_timestamp(commit.time().seconds(), 0)
                .unwrap_or(DateTime::UNIX_EPOCH);
            history.push(CommitStamp {
                commit: CommitRef::new(oid.to_string())?,
                time,
            });
        }

        history.reverse();
        Ok(history)
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Check out `commit` with a detached HEAD.
    ///
    /// The working tree is forced to match the commit exactly, including
    /// removal of files the commit does not contain.
    pub fn checkout_detached(&self, commit: &CommitRef) -> Result<(), GitError> {
        let oid = git2::Oid::from_str(commit.as_str())
            .map_err(|e| GitError::from_git2(e, commit.as_str()))?;
        let target = self
            .repo
            .find_commit(oid)
            .map_err(|e| GitError::from_git2(e, commit.as_str()))?;

        let mut checkout = git2::build::CheckoutBuilder::new();
        checkout.force().remove_untracked(true);
        self.repo
            .checkout_tree(target.as_object(), Some(&mut checkout))
            .map_err(|e| GitError::from_git2(e, commit.as_str()))?;
        self.repo
            .set_head_detached(oid)
            .map_err(|e| GitError::from_git2(e, commit.as_str()))?;

        Ok(())
    }
}
