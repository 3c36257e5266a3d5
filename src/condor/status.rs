//! condor::status
//!
//! HTCondor job status codes and per-endpoint tallies.

use super::traits::QueryError;

/// HTCondor `JobStatus` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum JobStatus {
    Idle,
    Running,
    Removed,
    Completed,
    Held,
    TransferringOutput,
    Suspended,
}

impl JobStatus {
    /// Every status, in code order.
    pub const ALL: [JobStatus; 7] = [
        JobStatus::Idle,
        JobStatus::Running,
        JobStatus::Removed,
        JobStatus::Completed,
        JobStatus::Held,
        JobStatus::TransferringOutput,
        JobStatus::Suspended,
    ];

    /// Map a `JobStatus` attribute value to its status.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(JobStatus::Idle),
            2 => Some(JobStatus::Running),
            3 => Some(JobStatus::Removed),
            4 => Some(JobStatus::Completed),
            5 => Some(JobStatus::Held),
            6 => Some(JobStatus::TransferringOutput),
            7 => Some(JobStatus::Suspended),
            _ => None,
        }
    }

    /// The `JobStatus` attribute value.
    pub fn code(self) -> i64 {
        self.index() as i64 + 1
    }

    /// Report column name.
    pub fn label(self) -> &'static str {
        match self {
            JobStatus::Idle => "IDLE",
            JobStatus::Running => "RUNNING",
            JobStatus::Removed => "REMOVED",
            JobStatus::Completed => "COMPLETED",
            JobStatus::Held => "HELD",
            JobStatus::TransferringOutput => "TRANSFERRING_OUTPUT",
            JobStatus::Suspended => "SUSPENDED",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Job counts of one endpoint, or the reason they could not be taken.
///
/// When `communication_error` is set every count is zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobTally {
    counts: [u64; 7],
    communication_error: Option<String>,
}

impl JobTally {
    /// Tally a list of `JobStatus` codes.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::UnknownStatus` for the first code outside the
    /// known range.
    pub fn from_codes(codes: impl IntoIterator<Item = i64>) -> Result<Self, QueryError> {
        let mut tally = Self::default();
        for code in codes {
            let status = JobStatus::from_code(code).ok_or(QueryError::UnknownStatus(code))?;
            tally.counts[status.index()] += 1;
        }
        Ok(tally)
    }

    /// A zeroed tally carrying the failure description.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            counts: [0; 7],
            communication_error: Some(reason.into()),
        }
    }

    /// Count for one status.
    pub fn count(&self, status: JobStatus) -> u64 {
        self.counts[status.index()]
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Statuses with their counts, in code order.
    pub fn iter(&self) -> impl Iterator<Item = (JobStatus, u64)> + '_ {
        JobStatus::ALL.iter().map(|s| (*s, self.count(*s)))
    }

    /// Why the endpoint could not be tallied, if it could not.
    pub fn communication_error(&self) -> Option<&str> {
        self.communication_error.as_deref()
    }

    /// Whether the counts are meaningful.
    pub fn is_ok(&self) -> bool {
        self.communication_error.is_none()
    }
}
