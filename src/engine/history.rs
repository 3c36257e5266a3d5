//! engine::history
//!
//! Monthly HTCondor-CE counts over the factory repository's history.
//!
//! # Stepping
//!
//! Probe dates start at a floor date and advance one calendar month at a
//! time. The day of month is clamped to the length of the target month, and
//! each step starts from the previous probe date, so Jan 31 steps to Feb 28
//! (or 29) and then to Mar 28. Stepping stops at the first date that is not
//! strictly before the end date.
//!
//! One snapshot serves the whole series; every probe moves its checkout.

use chrono::{Months, NaiveDate};
use tracing::debug;

use super::discover::{DiscoveryError, FactorySource};
use crate::core::types::CommitRef;
use crate::factory::RepositorySnapshot;

/// The same day of month in the next month, clamped to that month's length.
///
/// Returns `None` past the last representable date.
pub fn increment_month(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(1))
}

/// Monthly probe dates in `[start, until)`.
#[derive(Debug, Clone)]
pub struct MonthSteps {
    next: Option<NaiveDate>,
    until: NaiveDate,
}

impl MonthSteps {
    pub fn new(start: NaiveDate, until: NaiveDate) -> Self {
        Self {
            next: Some(start),
            until,
        }
    }
}

impl Iterator for MonthSteps {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let date = self.next.filter(|d| *d < self.until)?;
        self.next = increment_month(date);
        Some(date)
    }
}

/// One row of the historical series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthCount {
    /// Probe date
    pub month: NaiveDate,
    /// Commit the count was taken at
    pub commit: CommitRef,
    /// Number of distinct active production HTCondor-CEs
    pub count: usize,
}

/// Iterator over the historical series.
///
/// Borrows the snapshot mutably; the series ends at the first error.
pub struct HistoricalSeries<'a> {
    snapshot: &'a mut RepositorySnapshot,
    source: &'a FactorySource,
    steps: MonthSteps,
    failed: bool,
}

impl<'a> HistoricalSeries<'a> {
    pub fn new(
        snapshot: &'a mut RepositorySnapshot,
        source: &'a FactorySource,
        steps: MonthSteps,
    ) -> Self {
        Self {
            snapshot,
            source,
            steps,
            failed: false,
        }
    }

    fn probe(&mut self, month: NaiveDate) -> Result<MonthCount, DiscoveryError> {
        let commit = self.snapshot.checkout_at_date(month)?.clone();
        let count = self.source.extract(&*self.snapshot)?.len();
        debug!(%month, commit = %commit.short(10), count, "probed");
        Ok(MonthCount {
            month,
            commit,
            count,
        })
    }
}

impl Iterator for HistoricalSeries<'_> {
    type Item = Result<MonthCount, DiscoveryError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let month = self.steps.next()?;
        let result = self.probe(month);
        self.failed = result.is_err();
        Some(result)
    }
}
