//! endpoints command - List known HTCondor-CE endpoints

use anyhow::{Context, Result};

use super::{panda_registry, runtime};
use crate::cli::args::Source;
use crate::core::config::Config;
use crate::core::types::EndpointSet;
use crate::engine::{latest_factory_endpoints, reconcile, registry_sites, FactorySource, RegistryPolicy};
use crate::ui::report;

/// List endpoints from the chosen sources, or the registry's site grouping.
pub fn endpoints(config: &Config, source: Source, by_site: bool) -> Result<()> {
    let policy = RegistryPolicy::from_required(config.registry_required());

    if by_site {
        let registry = panda_registry(config)?;
        let sites = runtime()?.block_on(registry_sites(&registry, RegistryPolicy::Required))?;
        report::write_sites(std::io::stdout().lock(), &sites).context("failed to write report")?;
        return Ok(());
    }

    let factory = match source {
        Source::Config | Source::All => {
            latest_factory_endpoints(&FactorySource::from_config(config))
                .context("failed to read factory configuration")?
                .endpoints
        }
        Source::Registry => EndpointSet::new(),
    };

    let registry = match source {
        Source::Registry | Source::All => {
            let registry = panda_registry(config)?;
            runtime()?
                .block_on(registry_sites(&registry, policy))?
                .flatten()
        }
        Source::Config => EndpointSet::new(),
    };

    report::write_endpoints(std::io::stdout().lock(), &reconcile(&factory, &registry))
        .context("failed to write endpoint list")?;
    Ok(())
}
