//! core::config
//!
//! Configuration schema and loading.
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Settings file
//! 3. CLI flags (applied through [`Overrides`])
//!
//! # Settings File Locations
//!
//! Searched in order:
//! 1. `--config <path>` when given (must exist)
//! 2. `$CE_CENSUS_CONFIG` if set
//! 3. `$XDG_CONFIG_HOME/ce-census/config.toml`
//! 4. `~/.ce-census/config.toml`
//!
//! # Example
//!
//! ```no_run
//! use ce_census::core::config::Config;
//!
//! let config = Config::load(None).unwrap();
//! println!("Repository: {}", config.repository());
//! println!("Collector port: {}", config.collector_port());
//! ```

pub mod schema;

pub use schema::{CollectorSettings, FactorySettings, HistorySettings, RegistrySettings, Settings};

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDate;
use thiserror::Error;

/// Default factory configuration repository.
pub const DEFAULT_FACTORY_REPOSITORY: &str = "https://github.com/opensciencegrid/osg-gfactory";

/// Default branch of the factory repository.
pub const DEFAULT_FACTORY_BRANCH: &str = "master";

/// Default registry query endpoint.
pub const DEFAULT_REGISTRY_URL: &str =
    "http://atlas-agis-api.cern.ch/request/pandaqueue/query/list/";

/// Default HTCondor-CE collector port.
pub const DEFAULT_COLLECTOR_PORT: u16 = 9619;

const DEFAULT_REGISTRY_TIMEOUT_SECS: u64 = 60;
const DEFAULT_COLLECTOR_TIMEOUT_SECS: u64 = 60;
const DEFAULT_CONCURRENCY: usize = 8;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Values supplied on the command line.
///
/// `None` leaves the file (or default) value in place.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub repository: Option<String>,
    pub branch: Option<String>,
    pub registry_url: Option<String>,
    pub all_entries: bool,
    pub skip_malformed: bool,
}

/// Effective configuration.
///
/// Accessor methods apply defaults for anything the settings file and the
/// command line left unset.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Merged settings
    pub settings: Settings,
    /// Path to the settings file (if loaded)
    path: Option<PathBuf>,
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit path must exist. Otherwise the standard locations are
    /// searched and a missing file means defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read, parsed
    /// or validated.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound(path.to_path_buf()));
                }
                Some(path.to_path_buf())
            }
            None => Self::find_settings_file(),
        };

        let settings = match &path {
            Some(path) => Self::read_settings(path)?,
            None => Settings::default(),
        };
        settings.validate()?;

        Ok(Self { settings, path })
    }

    /// Search the standard locations for a settings file.
    fn find_settings_file() -> Option<PathBuf> {
        // 1. $CE_CENSUS_CONFIG
        if let Ok(path) = std::env::var("CE_CENSUS_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        // 2. $XDG_CONFIG_HOME/ce-census/config.toml
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("ce-census/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        // 3. ~/.ce-census/config.toml
        if let Some(home) = dirs::home_dir() {
            let path = home.join(".ce-census/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        None
    }

    /// Read and parse a settings file.
    fn read_settings(path: &Path) -> Result<Settings, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Apply command-line overrides and re-validate.
    pub fn apply(&mut self, overrides: &Overrides) -> Result<(), ConfigError> {
        let factory = self.settings.factory.get_or_insert_with(Default::default);
        if let Some(repository) = &overrides.repository {
            factory.repository = Some(repository.clone());
        }
        if let Some(branch) = &overrides.branch {
            factory.branch = Some(branch.clone());
        }
        if overrides.all_entries {
            factory.production_only = Some(false);
        }
        if overrides.skip_malformed {
            factory.skip_malformed = Some(true);
        }
        if let Some(url) = &overrides.registry_url {
            self.settings
                .registry
                .get_or_insert_with(Default::default)
                .url = Some(url.clone());
        }
        self.settings.validate()
    }

    /// Path of the loaded settings file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Factory repository URL or path.
    pub fn repository(&self) -> &str {
        self.factory()
            .and_then(|f| f.repository.as_deref())
            .unwrap_or(DEFAULT_FACTORY_REPOSITORY)
    }

    /// Branch whose history is walked.
    pub fn branch(&self) -> &str {
        self.factory()
            .and_then(|f| f.branch.as_deref())
            .unwrap_or(DEFAULT_FACTORY_BRANCH)
    }

    /// Whether non-production documents are excluded.
    pub fn production_only(&self) -> bool {
        self.factory()
            .and_then(|f| f.production_only)
            .unwrap_or(true)
    }

    /// Whether malformed documents are skipped rather than fatal.
    pub fn skip_malformed(&self) -> bool {
        self.factory()
            .and_then(|f| f.skip_malformed)
            .unwrap_or(false)
    }

    /// Registry query endpoint.
    pub fn registry_url(&self) -> &str {
        self.registry()
            .and_then(|r| r.url.as_deref())
            .unwrap_or(DEFAULT_REGISTRY_URL)
    }

    /// Registry request timeout.
    pub fn registry_timeout(&self) -> Duration {
        Duration::from_secs(
            self.registry()
                .and_then(|r| r.timeout_secs)
                .unwrap_or(DEFAULT_REGISTRY_TIMEOUT_SECS),
        )
    }

    /// Whether a registry failure fails the run.
    pub fn registry_required(&self) -> bool {
        self.registry().and_then(|r| r.required).unwrap_or(true)
    }

    /// Collector port on every CE.
    pub fn collector_port(&self) -> u16 {
        self.collector()
            .and_then(|c| c.port)
            .unwrap_or(DEFAULT_COLLECTOR_PORT)
    }

    /// Bound on each per-endpoint query.
    pub fn collector_timeout(&self) -> Duration {
        Duration::from_secs(
            self.collector()
                .and_then(|c| c.timeout_secs)
                .unwrap_or(DEFAULT_COLLECTOR_TIMEOUT_SECS),
        )
    }

    /// Maximum number of endpoints queried at once.
    pub fn concurrency(&self) -> usize {
        self.collector()
            .and_then(|c| c.concurrency)
            .unwrap_or(DEFAULT_CONCURRENCY)
    }

    /// `condor_q` executable.
    pub fn condor_q(&self) -> &str {
        self.collector()
            .and_then(|c| c.condor_q.as_deref())
            .unwrap_or("condor_q")
    }

    /// `condor_status` executable.
    pub fn condor_status(&self) -> &str {
        self.collector()
            .and_then(|c| c.condor_status.as_deref())
            .unwrap_or("condor_status")
    }

    /// First probe date of the historical series.
    ///
    /// Defaults to the start of the factory repository history that
    /// contains entries.
    pub fn history_start(&self) -> NaiveDate {
        self.settings
            .history
            .as_ref()
            .and_then(|h| h.start)
            .unwrap_or(NaiveDate::from_ymd_opt(2016, 5, 1).unwrap_or_default())
    }

    /// Render the effective settings (defaults filled in) as TOML.
    pub fn effective_toml(&self) -> Result<String, ConfigError> {
        let effective = Settings {
            factory: Some(FactorySettings {
                repository: Some(self.repository().to_string()),
                branch: Some(self.branch().to_string()),
                production_only: Some(self.production_only()),
                skip_malformed: Some(self.skip_malformed()),
            }),
            registry: Some(RegistrySettings {
                url: Some(self.registry_url().to_string()),
                timeout_secs: Some(self.registry_timeout().as_secs()),
                required: Some(self.registry_required()),
            }),
            collector: Some(CollectorSettings {
                port: Some(self.collector_port()),
                timeout_secs: Some(self.collector_timeout().as_secs()),
                concurrency: Some(self.concurrency()),
                condor_q: Some(self.condor_q().to_string()),
                condor_status: Some(self.condor_status().to_string()),
            }),
            history: Some(HistorySettings {
                start: Some(self.history_start()),
            }),
        };
        toml::to_string_pretty(&effective).map_err(|e| ConfigError::InvalidValue(e.to_string()))
    }

    fn factory(&self) -> Option<&FactorySettings> {
        self.settings.factory.as_ref()
    }

    fn registry(&self) -> Option<&RegistrySettings> {
        self.settings.registry.as_ref()
    }

    fn collector(&self) -> Option<&CollectorSettings> {
        self.settings.collector.as_ref()
    }
}
