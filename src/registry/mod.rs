//! registry
//!
//! Abstraction for live endpoint registries.
//!
//! # Architecture
//!
//! The `Registry` trait defines what the census needs from a registry: the
//! set of active production HTCondor-CEs, optionally grouped by site.
//! Commands depend on the trait; only [`panda`] talks HTTP.
//!
//! # Modules
//!
//! - `traits`: Core `Registry` trait, `SiteEndpoints`, `RegistryError`
//! - [`panda`]: PanDA queue registry over HTTP
//! - [`mock`]: Mock implementation for deterministic testing
//!
//! # Example
//!
//! ```ignore
//! use ce_census::registry::{PandaRegistry, Registry};
//! use std::time::Duration;
//!
//! let registry = PandaRegistry::new(url, Duration::from_secs(60))?;
//! for (site, endpoints) in registry.active_endpoints_by_site().await?.iter() {
//!     println!("{}: {}", site, endpoints.len());
//! }
//! ```

pub mod mock;
pub mod panda;
mod traits;

pub use panda::PandaRegistry;
pub use traits::*;
