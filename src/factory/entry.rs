//! factory::entry
//!
//! One `<entry>` record of a factory configuration document and the
//! predicate deciding whether it names an active HTCondor-CE.

use crate::core::types::Endpoint;

/// Literal value of `enabled` for an active entry.
pub const ENABLED: &str = "True";

/// Literal value of `gridtype` for an HTCondor-CE entry.
pub const CONDOR_GRIDTYPE: &str = "condor";

/// A factory entry, reduced to the attributes the census reads.
///
/// Missing attributes are `None` and behave like any non-matching value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigEntry {
    /// CE contact string
    pub gatekeeper: Option<String>,
    /// `"True"` when the entry is enabled
    pub enabled: Option<String>,
    /// Grid type tag
    pub gridtype: Option<String>,
}

impl ConfigEntry {
    /// Read the attributes of an `<entry>` element.
    pub fn from_node(node: roxmltree::Node<'_, '_>) -> Self {
        Self {
            gatekeeper: node.attribute("gatekeeper").map(str::to_string),
            enabled: node.attribute("enabled").map(str::to_string),
            gridtype: node.attribute("gridtype").map(str::to_string),
        }
    }

    /// Whether the entry is enabled and targets an HTCondor-CE.
    ///
    /// Both comparisons are exact and case-sensitive.
    pub fn is_active_condor(&self) -> bool {
        self.enabled.as_deref() == Some(ENABLED)
            && self.gridtype.as_deref() == Some(CONDOR_GRIDTYPE)
    }

    /// The normalized endpoint of an admitted entry.
    ///
    /// Returns `None` for rejected entries and for admitted entries whose
    /// gatekeeper normalizes to nothing.
    pub fn admit(&self) -> Option<Endpoint> {
        if !self.is_active_condor() {
            return None;
        }
        Endpoint::from_contact(self.gatekeeper.as_deref().unwrap_or(""))
    }
}
