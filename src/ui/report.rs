//! ui::report
//!
//! CSV reports on stdout.
//!
//! # Formats
//!
//! - Jobs: `HOSTNAME`, one column per job status, `COMMUNICATION_ERROR`
//! - History: `MONTH` (probe date, `YYYY-MM-DD`), `HTCONDOR_CE_COUNT`
//! - Sites: `SITE`, `HOSTNAME`
//!
//! The plain endpoint list is one hostname per line without a header.

use std::io::Write;

use crate::condor::{EndpointTally, JobStatus};
use crate::core::types::EndpointSet;
use crate::engine::MonthCount;
use crate::registry::SiteEndpoints;

/// Header of the jobs report.
pub fn jobs_header() -> Vec<&'static str> {
    let mut header = vec!["HOSTNAME"];
    header.extend(JobStatus::ALL.iter().map(|s| s.label()));
    header.push("COMMUNICATION_ERROR");
    header
}

/// Write the jobs report.
pub fn write_jobs<W: Write>(out: W, rows: &[EndpointTally]) -> csv::Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(jobs_header())?;

    for row in rows {
        let mut record = vec![row.endpoint.to_string()];
        record.extend(row.tally.iter().map(|(_, n)| n.to_string()));
        record.push(row.tally.communication_error().unwrap_or("").to_string());
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

/// Streaming writer for the historical series.
///
/// Rows are flushed as they are written, so partial output survives a
/// failure later in the series.
pub struct HistoryWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> HistoryWriter<W> {
    /// Start the report by writing its header.
    pub fn new(out: W) -> csv::Result<Self> {
        let mut writer = csv::Writer::from_writer(out);
        writer.write_record(["MONTH", "HTCONDOR_CE_COUNT"])?;
        writer.flush()?;
        Ok(Self { writer })
    }

    pub fn write(&mut self, row: &MonthCount) -> csv::Result<()> {
        self.writer.write_record([
            row.month.format("%Y-%m-%d").to_string(),
            row.count.to_string(),
        ])?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Write one hostname per line.
pub fn write_endpoints<W: Write>(mut out: W, endpoints: &EndpointSet) -> std::io::Result<()> {
    for endpoint in endpoints {
        writeln!(out, "{}", endpoint)?;
    }
    out.flush()
}

/// Write the site grouping, one row per site and hostname.
pub fn write_sites<W: Write>(out: W, sites: &SiteEndpoints) -> csv::Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(["SITE", "HOSTNAME"])?;
    for (site, endpoints) in sites.iter() {
        for endpoint in endpoints {
            writer.write_record([site.as_str(), endpoint.as_str()])?;
        }
    }
    writer.flush()?;
    Ok(())
}
