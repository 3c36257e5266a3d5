//! history command - Monthly HTCondor-CE counts

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use tracing::info;

use crate::core::config::Config;
use crate::engine::{FactorySource, HistoricalSeries, MonthSteps};
use crate::ui::report::HistoryWriter;

/// Write one `MONTH,HTCONDOR_CE_COUNT` row per probe date in `[since, until)`.
///
/// `since` defaults to the configured history start and `until` to today.
pub fn history(config: &Config, since: Option<NaiveDate>, until: Option<NaiveDate>) -> Result<()> {
    let start = since.unwrap_or_else(|| config.history_start());
    let until = until.unwrap_or_else(|| Local::now().date_naive());

    let source = FactorySource::from_config(config);
    let mut snapshot = source
        .snapshot()
        .context("failed to read factory configuration")?;
    info!(
        %start,
        %until,
        commits = snapshot.timeline().len(),
        "walking factory history"
    );

    let mut writer = HistoryWriter::new(std::io::stdout().lock()).context("failed to write report")?;
    for row in HistoricalSeries::new(&mut snapshot, &source, MonthSteps::new(start, until)) {
        let row = row.context("failed to count endpoints")?;
        writer.write(&row).context("failed to write report")?;
    }
    Ok(())
}
