//! registry::traits
//!
//! Registry trait definition and the shared response types.
//!
//! # Design
//!
//! The `Registry` trait is async because registry queries involve network
//! I/O. A registry answers with the active HTCondor-CE endpoints grouped by
//! site; site-agnostic callers flatten that with
//! [`Registry::active_endpoints`].

use std::collections::BTreeMap;

use async_trait::async_trait;
use thiserror::Error;

use crate::core::types::{Endpoint, EndpointSet, Site};

/// Errors from registry queries.
///
/// Every variant means the registry is unavailable for this run.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// Network or connection error (including timeouts).
    #[error("registry unavailable: network error: {0}")]
    Network(String),

    /// The registry answered with a non-success status.
    #[error("registry unavailable: HTTP {status}")]
    Status {
        /// HTTP status code
        status: u16,
    },

    /// The response body was not the expected JSON shape.
    #[error("registry unavailable: malformed response: {0}")]
    Malformed(String),
}

/// Endpoints grouped by registry site.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteEndpoints(BTreeMap<Site, EndpointSet>);

impl SiteEndpoints {
    /// Create an empty grouping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one endpoint under `site`.
    pub fn insert(&mut self, site: Site, endpoint: Endpoint) {
        self.0.entry(site).or_default().insert(endpoint);
    }

    /// Endpoints of one site.
    pub fn get(&self, site: &Site) -> Option<&EndpointSet> {
        self.0.get(site)
    }

    /// Iterate sites and their endpoints.
    pub fn iter(&self) -> impl Iterator<Item = (&Site, &EndpointSet)> {
        self.0.iter()
    }

    /// Number of sites.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no site has any endpoint.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// All endpoints, regardless of site.
    pub fn flatten(&self) -> EndpointSet {
        self.0.values().flatten().cloned().collect()
    }
}

/// The Registry trait for querying live endpoint inventories.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow use across async tasks.
#[async_trait]
pub trait Registry: Send + Sync {
    /// Get the registry name for display.
    fn name(&self) -> &'static str;

    /// Active production HTCondor-CE endpoints, grouped by site.
    async fn active_endpoints_by_site(&self) -> Result<SiteEndpoints, RegistryError>;

    /// Active production HTCondor-CE endpoints.
    async fn active_endpoints(&self) -> Result<EndpointSet, RegistryError> {
        Ok(self.active_endpoints_by_site().await?.flatten())
    }
}
