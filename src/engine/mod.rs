//! engine
//!
//! Census orchestration: discover endpoints, reconcile sources, walk history.
//!
//! # Architecture
//!
//! The engine wires the endpoint sources together. It owns no I/O of its
//! own; every external effect goes through [`crate::factory`],
//! [`crate::registry`] or [`crate::condor`].
//!
//! ```text
//! factory repo ──► FactorySource ──┐
//!                                  ├─► reconcile ──► collect_all ──► report
//! registry ──► registry_sites ─────┘
//! ```
//!
//! # Invariants
//!
//! - Every snapshot is removed when its scope ends, on success or error
//! - A registry failure fails the run only under `RegistryPolicy::Required`
//! - The historical series is strictly chronological
//!
//! # Example
//!
//! ```ignore
//! use ce_census::engine::{latest_factory_endpoints, reconcile, registry_sites};
//!
//! let factory = latest_factory_endpoints(&source)?;
//! let sites = registry_sites(&registry, RegistryPolicy::Required).await?;
//! let endpoints = reconcile(&factory.endpoints, &sites.flatten());
//! ```

pub mod discover;
pub mod history;
pub mod reconcile;

pub use discover::{
    latest_factory_endpoints, registry_sites, DiscoveryError, FactoryEndpoints, FactorySource,
    RegistryPolicy,
};
pub use history::{increment_month, HistoricalSeries, MonthCount, MonthSteps};
pub use reconcile::reconcile;
