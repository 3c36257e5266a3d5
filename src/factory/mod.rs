//! factory
//!
//! The GlideinWMS factory configuration repository as an endpoint source.
//!
//! # Modules
//!
//! - `entry` - One factory entry and the HTCondor-CE admission predicate
//! - `extract` - Document discovery and endpoint extraction
//! - `timeline` - Date-to-commit selection over first-parent history
//! - `snapshot` - Owned, re-checkoutable working copy of the repository
//!
//! # Example
//!
//! ```ignore
//! use ce_census::factory::{extract_endpoints, OnMalformed, RepositorySnapshot};
//!
//! let snapshot = RepositorySnapshot::clone_from(url, "master")?;
//! let endpoints = extract_endpoints(snapshot.path(), true, OnMalformed::Fail)?;
//! println!("{} HTCondor-CEs", endpoints.len());
//! ```

pub mod entry;
pub mod extract;
pub mod snapshot;
pub mod timeline;

pub use entry::ConfigEntry;
pub use extract::{extract_endpoints, ExtractError, OnMalformed};
pub use snapshot::{RepositorySnapshot, SnapshotError};
pub use timeline::{local_midnight, Timeline};
