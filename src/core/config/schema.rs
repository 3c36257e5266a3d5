//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Settings File
//!
//! Located at (in order of precedence):
//! 1. `$CE_CENSUS_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/ce-census/config.toml`
//! 3. `~/.ce-census/config.toml`
//!
//! Every field is optional; unset fields fall back to the defaults exposed
//! by the accessors on [`super::Config`].
//!
//! # Validation
//!
//! Values are validated after parsing (non-empty names, parseable URLs,
//! positive ports, timeouts and concurrency).

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Settings file contents.
///
/// # Example
///
/// ```toml
/// [factory]
/// repository = "https://github.com/opensciencegrid/osg-gfactory"
/// branch = "master"
/// production_only = true
///
/// [registry]
/// url = "http://atlas-agis-api.cern.ch/request/pandaqueue/query/list/"
/// timeout_secs = 60
///
/// [collector]
/// port = 9619
/// concurrency = 8
///
/// [history]
/// start = "2016-05-01"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Factory configuration repository
    pub factory: Option<FactorySettings>,

    /// Endpoint registry
    pub registry: Option<RegistrySettings>,

    /// Per-endpoint job queue queries
    pub collector: Option<CollectorSettings>,

    /// Historical series
    pub history: Option<HistorySettings>,
}

impl Settings {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(factory) = &self.factory {
            factory.validate()?;
        }
        if let Some(registry) = &self.registry {
            registry.validate()?;
        }
        if let Some(collector) = &self.collector {
            collector.validate()?;
        }
        Ok(())
    }
}

/// Factory configuration repository settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FactorySettings {
    /// Repository URL or local path to clone
    pub repository: Option<String>,

    /// Branch whose first-parent history is walked
    pub branch: Option<String>,

    /// Exclude non-production (`-itb`) documents
    pub production_only: Option<bool>,

    /// Skip malformed documents instead of failing the run
    pub skip_malformed: Option<bool>,
}

impl FactorySettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(repository) = &self.repository {
            if repository.trim().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "factory.repository cannot be empty".to_string(),
                ));
            }
        }
        if let Some(branch) = &self.branch {
            if branch.trim().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "factory.branch cannot be empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Endpoint registry settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RegistrySettings {
    /// Base URL of the registry query endpoint
    pub url: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,

    /// Fail the run when the registry is unavailable
    pub required: Option<bool>,
}

impl RegistrySettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(url) = &self.url {
            reqwest::Url::parse(url).map_err(|e| {
                ConfigError::InvalidValue(format!("invalid registry.url '{}': {}", url, e))
            })?;
        }
        if self.timeout_secs == Some(0) {
            return Err(ConfigError::InvalidValue(
                "registry.timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Job queue query settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CollectorSettings {
    /// Collector port on every CE
    pub port: Option<u16>,

    /// Bound on each per-endpoint query, in seconds
    pub timeout_secs: Option<u64>,

    /// Maximum number of endpoints queried at once
    pub concurrency: Option<usize>,

    /// Path to `condor_q`
    pub condor_q: Option<String>,

    /// Path to `condor_status`
    pub condor_status: Option<String>,
}

impl CollectorSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.port == Some(0) {
            return Err(ConfigError::InvalidValue(
                "collector.port must be positive".to_string(),
            ));
        }
        if self.timeout_secs == Some(0) {
            return Err(ConfigError::InvalidValue(
                "collector.timeout_secs must be positive".to_string(),
            ));
        }
        if self.concurrency == Some(0) {
            return Err(ConfigError::InvalidValue(
                "collector.concurrency must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Historical series settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct HistorySettings {
    /// First probe date
    pub start: Option<chrono::NaiveDate>,
}
