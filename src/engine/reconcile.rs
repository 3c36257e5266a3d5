//! engine::reconcile
//!
//! Merge endpoint sets from independent sources.

use crate::core::types::EndpointSet;

/// Union of two endpoint sets.
///
/// Endpoints are already normalized, so identical hosts from both sources
/// collapse into one.
pub fn reconcile(factory: &EndpointSet, registry: &EndpointSet) -> EndpointSet {
    factory.union(registry).cloned().collect()
}
