//! git
//!
//! Single interface for all Git operations.
//!
//! # Architecture
//!
//! This module is the **ONLY doorway** to Git. No other module should
//! import `git2`, and nothing shells out to the git CLI.
//!
//! # Responsibilities
//!
//! - Cloning a repository into an owned directory
//! - First-parent history listing with commit times
//! - Detached checkout of one commit
//!
//! # Invariants
//!
//! - History is returned oldest first and follows first parents only
//! - All operations return strong types (CommitRef)

mod interface;

pub use interface::{CommitStamp, Git, GitError};
