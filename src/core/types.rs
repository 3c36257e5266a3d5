//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`Endpoint`] - Canonical CE host identifier
//! - [`EndpointSet`] - Deduplicated set of endpoints
//! - [`Site`] - Registry grouping key
//! - [`CommitRef`] - Git commit identifier
//!
//! # Normalization
//!
//! CE contact strings come in several notations:
//!
//! - `<FQDN>`
//! - `<FQDN>:<PORT>`
//! - `<FQDN> <FQDN>:<PORT>`
//!
//! All of them reduce to the bare `<FQDN>` through [`normalize_contact`].
//! Every endpoint in this crate is built through that single function, so
//! two contact strings naming the same host compare equal as [`Endpoint`]s.
//!
//! # Examples
//!
//! ```
//! use ce_census::core::types::{normalize_contact, Endpoint};
//!
//! assert_eq!(normalize_contact("ce.example.org:9619"), "ce.example.org");
//! assert_eq!(
//!     normalize_contact("ce.example.org ce.example.org:9619"),
//!     "ce.example.org"
//! );
//!
//! let endpoint = Endpoint::from_contact("ce.example.org:9619").unwrap();
//! assert_eq!(endpoint.as_str(), "ce.example.org");
//! assert!(Endpoint::from_contact("   ").is_none());
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("invalid commit id: {0}")]
    InvalidCommit(String),
}

/// Reduce a CE contact string to its canonical host identifier.
///
/// Takes the first whitespace-delimited token and drops everything from its
/// first `:` onward. Empty or blank input yields an empty string, which
/// callers treat as unusable.
///
/// The function is idempotent: a normalized value normalizes to itself.
pub fn normalize_contact(contact: &str) -> &str {
    let first = contact.split_whitespace().next().unwrap_or("");
    match first.find(':') {
        Some(idx) => &first[..idx],
        None => first,
    }
}

/// A canonical CE host identifier.
///
/// Never empty, never carries a port or a second token.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Endpoint(String);

impl Endpoint {
    /// Create an endpoint from an already canonical host name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidEndpoint` if `host` is empty or is not
    /// in canonical form.
    pub fn new(host: impl Into<String>) -> Result<Self, TypeError> {
        let host = host.into();
        if host.is_empty() {
            return Err(TypeError::InvalidEndpoint("endpoint cannot be empty".into()));
        }
        if normalize_contact(&host) != host {
            return Err(TypeError::InvalidEndpoint(format!(
                "'{}' is not a canonical host name",
                host
            )));
        }
        Ok(Self(host))
    }

    /// Normalize a contact string into an endpoint.
    ///
    /// Returns `None` when normalization leaves nothing usable.
    pub fn from_contact(contact: &str) -> Option<Self> {
        let host = normalize_contact(contact);
        if host.is_empty() {
            None
        } else {
            Some(Self(host.to_string()))
        }
    }

    /// Get the host name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Endpoint {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Endpoint> for String {
    fn from(endpoint: Endpoint) -> Self {
        endpoint.0
    }
}

impl AsRef<str> for Endpoint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A deduplicated set of endpoints.
///
/// Iteration order is sorted, which keeps reports stable between runs; no
/// caller may depend on it beyond that.
pub type EndpointSet = BTreeSet<Endpoint>;

/// A registry site name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Site(String);

impl Site {
    /// Create a site from its registry name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the site name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Site {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A Git commit identifier (SHA-1 or SHA-256).
///
/// Normalized to lowercase. Only equality is meaningful here; chronology
/// lives in [`crate::factory::Timeline`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CommitRef(String);

impl CommitRef {
    /// Create a new validated commit id.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidCommit` if the string is not a 40 or 64
    /// character hex id.
    pub fn new(oid: impl Into<String>) -> Result<Self, TypeError> {
        let oid = oid.into().to_ascii_lowercase();
        if oid.len() != 40 && oid.len() != 64 {
            return Err(TypeError::InvalidCommit(format!(
                "expected 40 or 64 hex characters, got {}",
                oid.len()
            )));
        }
        if !oid.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TypeError::InvalidCommit(
                "commit id must be hexadecimal".into(),
            ));
        }
        Ok(Self(oid))
    }

    /// Get an abbreviated form of the commit id.
    pub fn short(&self, len: usize) -> &str {
        let end = len.min(self.0.len());
        &self.0[..end]
    }

    /// Get the commit id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CommitRef {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<CommitRef> for String {
    fn from(commit: CommitRef) -> Self {
        commit.0
    }
}

impl std::fmt::Display for CommitRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod normalize {
        use super::*;

        #[test]
        fn strips_port() {
            assert_eq!(normalize_contact("ce.example.org:9619"), "ce.example.org");
        }

        #[test]
        fn bare_host_unchanged() {
            assert_eq!(normalize_contact("ce.example.org"), "ce.example.org");
        }

        #[test]
        fn duplicated_host_takes_first_token() {
            assert_eq!(
                normalize_contact("ce1.example.org ce2.example.org:9619"),
                "ce1.example.org"
            );
        }

        #[test]
        fn first_token_with_port() {
            assert_eq!(
                normalize_contact("ce1.example.org:9619 ce1.example.org:9619"),
                "ce1.example.org"
            );
        }

        #[test]
        fn leading_whitespace_ignored() {
            assert_eq!(normalize_contact("  ce.example.org:9619"), "ce.example.org");
        }

        #[test]
        fn empty_input_is_empty() {
            assert_eq!(normalize_contact(""), "");
            assert_eq!(normalize_contact("   "), "");
        }

        #[test]
        fn port_only_is_empty() {
            assert_eq!(normalize_contact(":9619"), "");
        }

        #[test]
        fn idempotent() {
            for contact in [
                "ce.example.org",
                "ce.example.org:9619",
                "a.example.org b.example.org:9619",
                "",
            ] {
                let once = normalize_contact(contact);
                assert_eq!(normalize_contact(once), once);
            }
        }
    }

    mod endpoint {
        use super::*;

        #[test]
        fn from_contact_normalizes() {
            let ep = Endpoint::from_contact("ce.example.org:9619").unwrap();
            assert_eq!(ep.as_str(), "ce.example.org");
        }

        #[test]
        fn from_contact_rejects_blank() {
            assert!(Endpoint::from_contact("").is_none());
            assert!(Endpoint::from_contact(" \t").is_none());
        }

        #[test]
        fn decorated_contacts_compare_equal() {
            let a = Endpoint::from_contact("ce.example.org:9619").unwrap();
            let b = Endpoint::from_contact("ce.example.org ce.example.org:9619").unwrap();
            let c = Endpoint::from_contact("ce.example.org").unwrap();
            assert_eq!(a, b);
            assert_eq!(b, c);
        }

        #[test]
        fn new_requires_canonical() {
            assert!(Endpoint::new("ce.example.org").is_ok());
            assert!(Endpoint::new("ce.example.org:9619").is_err());
            assert!(Endpoint::new("").is_err());
        }

        #[test]
        fn serde_roundtrip() {
            let ep = Endpoint::new("ce.example.org").unwrap();
            let json = serde_json::to_string(&ep).unwrap();
            assert_eq!(json, "\"ce.example.org\"");
            let parsed: Endpoint = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, ep);
        }

        #[test]
        fn set_deduplicates() {
            let set: EndpointSet = ["a.org:1", "a.org", "b.org a.org:2"]
                .iter()
                .filter_map(|c| Endpoint::from_contact(c))
                .collect();
            assert_eq!(set.len(), 2);
        }
    }

    mod commit_ref {
        use super::*;

        #[test]
        fn valid_sha1() {
            let c = CommitRef::new("ABC123DEF4567890ABC123DEF4567890ABC12345").unwrap();
            assert_eq!(c.as_str(), "abc123def4567890abc123def4567890abc12345");
            assert_eq!(c.short(7), "abc123d");
        }

        #[test]
        fn invalid_length() {
            assert!(CommitRef::new("abc123").is_err());
        }

        #[test]
        fn invalid_chars() {
            assert!(CommitRef::new("g".repeat(40)).is_err());
        }
    }
}
