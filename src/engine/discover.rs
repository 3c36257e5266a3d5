//! engine::discover
//!
//! Endpoint discovery from the factory repository and the registry.
//!
//! The factory side is blocking (clone, checkout, parse); the registry side
//! is async. Callers run the first directly and await the second.

use thiserror::Error;
use tracing::{info, warn};

use crate::core::config::Config;
use crate::core::types::{CommitRef, EndpointSet};
use crate::factory::{extract_endpoints, ExtractError, OnMalformed, RepositorySnapshot, SnapshotError};
use crate::registry::{Registry, RegistryError, SiteEndpoints};

/// Errors from endpoint discovery.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Where and how to read factory configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactorySource {
    pub repository: String,
    pub branch: String,
    pub production_only: bool,
    pub on_malformed: OnMalformed,
}

impl FactorySource {
    /// The factory source described by `config`.
    pub fn from_config(config: &Config) -> Self {
        Self {
            repository: config.repository().to_string(),
            branch: config.branch().to_string(),
            production_only: config.production_only(),
            on_malformed: OnMalformed::from_skip(config.skip_malformed()),
        }
    }

    /// Clone the repository. The clone is removed when the snapshot drops.
    pub fn snapshot(&self) -> Result<RepositorySnapshot, DiscoveryError> {
        Ok(RepositorySnapshot::clone_from(&self.repository, &self.branch)?)
    }

    /// Endpoints in the snapshot's current checkout.
    pub fn extract(&self, snapshot: &RepositorySnapshot) -> Result<EndpointSet, DiscoveryError> {
        Ok(extract_endpoints(
            snapshot.path(),
            self.production_only,
            self.on_malformed,
        )?)
    }
}

/// Endpoints found at the tip of the factory branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactoryEndpoints {
    pub commit: CommitRef,
    pub endpoints: EndpointSet,
}

/// Read the endpoints at the tip of the configured branch.
pub fn latest_factory_endpoints(source: &FactorySource) -> Result<FactoryEndpoints, DiscoveryError> {
    let mut snapshot = source.snapshot()?;
    let commit = snapshot.checkout_latest()?.clone();
    let endpoints = source.extract(&snapshot)?;
    info!(commit = %commit.short(10), count = endpoints.len(), "factory endpoints");
    Ok(FactoryEndpoints { commit, endpoints })
}

/// How a registry failure affects the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryPolicy {
    /// A registry failure fails the run
    Required,
    /// A registry failure is logged and the registry contributes nothing
    BestEffort,
}

impl RegistryPolicy {
    /// Policy from a "registry required" setting.
    pub fn from_required(required: bool) -> Self {
        if required {
            RegistryPolicy::Required
        } else {
            RegistryPolicy::BestEffort
        }
    }
}

/// Query the registry's active endpoints, grouped by site.
pub async fn registry_sites<R: Registry + ?Sized>(
    registry: &R,
    policy: RegistryPolicy,
) -> Result<SiteEndpoints, DiscoveryError> {
    match registry.active_endpoints_by_site().await {
        Ok(sites) => {
            info!(
                registry = registry.name(),
                sites = sites.len(),
                "registry endpoints"
            );
            Ok(sites)
        }
        Err(e) if policy == RegistryPolicy::BestEffort => {
            warn!(registry = registry.name(), error = %e, "continuing without registry");
            Ok(SiteEndpoints::new())
        }
        Err(e) => Err(e.into()),
    }
}
