//! registry::mock
//!
//! Mock registry implementation for deterministic testing.
//!
//! # Example
//!
//! ```
//! use ce_census::registry::mock::MockRegistry;
//! use ce_census::registry::Registry;
//!
//! # tokio_test::block_on(async {
//! let registry = MockRegistry::new()
//!     .with_endpoint("SITE_A", "ce1.example.org:9619")
//!     .with_endpoint("SITE_B", "ce2.example.org");
//!
//! let endpoints = registry.active_endpoints().await.unwrap();
//! assert_eq!(endpoints.len(), 2);
//! assert_eq!(registry.calls(), 1);
//! # });
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use super::traits::{Registry, RegistryError, SiteEndpoints};
use crate::core::types::{Endpoint, Site};

/// Mock registry for testing.
///
/// Clones share the call counter.
#[derive(Debug, Clone, Default)]
pub struct MockRegistry {
    /// Canned answer
    sites: SiteEndpoints,
    /// Error to return instead of the canned answer
    fail_with: Option<RegistryError>,
    /// Number of queries made
    calls: Arc<AtomicUsize>,
}

impl MockRegistry {
    /// Create a registry with no endpoints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an endpoint under `site`, normalizing `contact`.
    ///
    /// Contacts that normalize to nothing are ignored, as the real
    /// registry client does.
    pub fn with_endpoint(mut self, site: &str, contact: &str) -> Self {
        if let Some(endpoint) = Endpoint::from_contact(contact) {
            self.sites.insert(Site::new(site), endpoint);
        }
        self
    }

    /// Make every query fail with `error`.
    pub fn failing(error: RegistryError) -> Self {
        Self {
            fail_with: Some(error),
            ..Self::default()
        }
    }

    /// Number of queries made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Registry for MockRegistry {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn active_endpoints_by_site(&self) -> Result<SiteEndpoints, RegistryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.fail_with {
            Some(err) => Err(err.clone()),
            None => Ok(self.sites.clone()),
        }
    }
}
