//! jobs command - Tally the job queue of every known HTCondor-CE

use anyhow::{Context, Result};
use tracing::info;

use super::{condor_cli, panda_registry, runtime};
use crate::condor::collect_all;
use crate::core::config::Config;
use crate::core::types::EndpointSet;
use crate::engine::{latest_factory_endpoints, reconcile, registry_sites, FactorySource, RegistryPolicy};
use crate::ui::report;

/// Tally the jobs of the reconciled endpoint set and write the CSV report.
pub fn jobs(config: &Config, no_registry: bool, allow_registry_failure: bool) -> Result<()> {
    let source = FactorySource::from_config(config);
    let factory = latest_factory_endpoints(&source).context("failed to read factory configuration")?;

    let policy = if allow_registry_failure {
        RegistryPolicy::BestEffort
    } else {
        RegistryPolicy::from_required(config.registry_required())
    };

    runtime()?.block_on(jobs_async(config, &factory.endpoints, no_registry, policy))
}

async fn jobs_async(
    config: &Config,
    factory: &EndpointSet,
    no_registry: bool,
    policy: RegistryPolicy,
) -> Result<()> {
    let registry = if no_registry {
        EndpointSet::new()
    } else {
        registry_sites(&panda_registry(config)?, policy)
            .await?
            .flatten()
    };

    let endpoints = reconcile(factory, &registry);
    info!(
        endpoints = endpoints.len(),
        concurrency = config.concurrency(),
        "querying job queues"
    );

    let rows = collect_all(&condor_cli(config), &endpoints, config.concurrency()).await;
    let failed = rows.iter().filter(|r| !r.tally.is_ok()).count();
    if failed > 0 {
        info!(failed, "some endpoints could not be queried");
    }

    report::write_jobs(std::io::stdout().lock(), &rows).context("failed to write report")?;
    Ok(())
}
