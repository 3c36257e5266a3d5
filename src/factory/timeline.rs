//! factory::timeline
//!
//! Date-to-commit selection over a first-parent history.
//!
//! # Semantics
//!
//! For a target date `D` the selected commit is the most recent commit of
//! the chain whose commit time is strictly before midnight (local time) of
//! `D`. When no commit qualifies, `D` predates the repository and the
//! earliest commit of the chain is selected. A date past the tip selects
//! the tip.
//!
//! "Most recent" means latest in chain order, not greatest timestamp:
//! commit clocks can be skewed, and the chain order is what `--first-parent`
//! history shows. Lookup stays a binary search by indexing each commit with
//! the minimum timestamp of itself and everything after it in the chain.
//! That suffix minimum is monotonic, and the last commit whose suffix
//! minimum precedes the cutoff is exactly the last commit whose own time
//! precedes it.

use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::core::types::CommitRef;
use crate::git::CommitStamp;

/// Midnight at the start of `date` in the local time zone.
///
/// Falls back to UTC midnight when local midnight does not exist (a DST
/// gap at 00:00).
pub fn local_midnight(date: NaiveDate) -> DateTime<Utc> {
    let naive = date.and_time(NaiveTime::MIN);
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_else(|| naive.and_utc())
}

/// A first-parent history indexed for date lookups.
#[derive(Debug, Clone)]
pub struct Timeline {
    /// Commits, oldest first
    commits: Vec<CommitStamp>,
    /// `suffix_min[i]` = earliest time among `commits[i..]`
    suffix_min: Vec<DateTime<Utc>>,
}

impl Timeline {
    /// Index a history given oldest first.
    ///
    /// Returns `None` for an empty history.
    pub fn new(commits: Vec<CommitStamp>) -> Option<Self> {
        if commits.is_empty() {
            return None;
        }

        let mut suffix_min = vec![DateTime::<Utc>::MAX_UTC; commits.len()];
        let mut running = DateTime::<Utc>::MAX_UTC;
        for (i, stamp) in commits.iter().enumerate().rev() {
            running = running.min(stamp.time);
            suffix_min[i] = running;
        }

        Some(Self {
            commits,
            suffix_min,
        })
    }

    /// Number of commits on the chain.
    pub fn len(&self) -> usize {
        self.commits.len()
    }

    /// Always false; an empty history has no timeline.
    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    /// The first commit of the chain.
    pub fn earliest(&self) -> &CommitStamp {
        &self.commits[0]
    }

    /// The tip of the chain.
    pub fn latest(&self) -> &CommitStamp {
        &self.commits[self.commits.len() - 1]
    }

    /// The last commit whose time is strictly before `cutoff`, if any.
    pub fn last_before(&self, cutoff: DateTime<Utc>) -> Option<&CommitStamp> {
        let qualifying = self.suffix_min.partition_point(|t| *t < cutoff);
        qualifying.checked_sub(1).map(|i| &self.commits[i])
    }

    /// The commit current at the start of `cutoff`, or the earliest commit
    /// when the history starts later.
    pub fn resolve(&self, cutoff: DateTime<Utc>) -> &CommitStamp {
        self.last_before(cutoff).unwrap_or_else(|| self.earliest())
    }

    /// The commit current at local midnight of `date`.
    pub fn resolve_date(&self, date: NaiveDate) -> &CommitRef {
        &self.resolve(local_midnight(date)).commit
    }
}
