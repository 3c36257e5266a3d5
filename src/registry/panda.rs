//! registry::panda
//!
//! PanDA queue registry (CRIC/AGIS) implementation.
//!
//! # Query
//!
//! One GET against the configured base URL with a fixed filter: active,
//! production, HTCondor-CE queues only. The response is a JSON object keyed
//! by opaque resource names:
//!
//! ```json
//! {
//!   "RESOURCE_A": {
//!     "atlas_site": "SITE_A",
//!     "queues": [ { "ce_endpoint": "ce1.example.org:9619" } ]
//!   }
//! }
//! ```
//!
//! A body that is not a JSON object is malformed. A resource without a
//! string `atlas_site` or an array `queues`, and a queue without a string
//! `ce_endpoint`, are skipped.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use super::traits::{Registry, RegistryError, SiteEndpoints};
use crate::core::types::{Endpoint, Site};

/// Fixed filter appended to the base URL.
pub const ACTIVE_CONDOR_CE_QUERY: &str =
    "json&preset=schedconf.all&state=ACTIVE&ce_flavour=HTCONDOR-CE&is_production=TRUE";

/// User-Agent header value for registry requests.
const USER_AGENT_VALUE: &str = "ce-census";

/// PanDA queue registry client.
#[derive(Debug, Clone)]
pub struct PandaRegistry {
    /// HTTP client for making requests
    client: Client,
    /// Base URL with the filter already applied
    query_url: Url,
}

impl PandaRegistry {
    /// Create a client for the registry at `base_url`.
    ///
    /// Each request is bounded by `timeout`.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Network` if the URL does not parse or the
    /// HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RegistryError> {
        let mut query_url = Url::parse(base_url)
            .map_err(|e| RegistryError::Network(format!("invalid registry URL: {}", e)))?;
        query_url.set_query(Some(ACTIVE_CONDOR_CE_QUERY));

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT_VALUE)
            .build()
            .map_err(|e| RegistryError::Network(e.to_string()))?;

        Ok(Self { client, query_url })
    }

    /// The full URL queried.
    pub fn query_url(&self) -> &Url {
        &self.query_url
    }
}

#[async_trait]
impl Registry for PandaRegistry {
    fn name(&self) -> &'static str {
        "panda"
    }

    async fn active_endpoints_by_site(&self) -> Result<SiteEndpoints, RegistryError> {
        info!(url = %self.query_url, "querying registry");
        let response = self
            .client
            .get(self.query_url.clone())
            .send()
            .await
            .map_err(|e| RegistryError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RegistryError::Status {
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| RegistryError::Network(e.to_string()))?;
        let sites = parse_response(&body)?;
        debug!(
            sites = sites.len(),
            endpoints = sites.flatten().len(),
            "parsed registry response"
        );
        Ok(sites)
    }
}

/// Resource record as the registry sends it.
#[derive(Debug, Deserialize)]
struct ResourceRecord {
    atlas_site: String,
    queues: Vec<Value>,
}

/// Parse a registry response body.
pub fn parse_response(body: &[u8]) -> Result<SiteEndpoints, RegistryError> {
    let resources: serde_json::Map<String, Value> =
        serde_json::from_slice(body).map_err(|e| RegistryError::Malformed(e.to_string()))?;

    let mut sites = SiteEndpoints::new();
    for (key, value) in resources {
        let record: ResourceRecord = match serde_json::from_value(value) {
            Ok(record) => record,
            Err(e) => {
                debug!(resource = %key, error = %e, "skipping resource record");
                continue;
            }
        };

        let site = Site::new(record.atlas_site);
        for queue in &record.queues {
            let endpoint = queue
                .get("ce_endpoint")
                .and_then(Value::as_str)
                .and_then(Endpoint::from_contact);
            match endpoint {
                Some(endpoint) => sites.insert(site.clone(), endpoint),
                None => debug!(resource = %key, "skipping queue without CE endpoint"),
            }
        }
    }

    Ok(sites)
}
