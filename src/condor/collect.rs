//! condor::collect
//!
//! Tally job queues with per-endpoint failure isolation.
//!
//! A failed query never escapes as an error: it becomes a zeroed tally that
//! carries the failure's description, and the other endpoints are tallied
//! as usual.

use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

use super::status::JobTally;
use super::traits::JobQueue;
use crate::core::types::{Endpoint, EndpointSet};

/// One report row: an endpoint and its tally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointTally {
    pub endpoint: Endpoint,
    pub tally: JobTally,
}

/// Tally the jobs of one endpoint.
pub async fn collect_tally<Q: JobQueue + ?Sized>(queue: &Q, endpoint: &Endpoint) -> EndpointTally {
    let tally = match queue
        .job_statuses(endpoint)
        .await
        .and_then(JobTally::from_codes)
    {
        Ok(tally) => {
            debug!(%endpoint, jobs = tally.total(), "tallied");
            tally
        }
        Err(e) => {
            warn!(%endpoint, error = %e, "failed to query job queue");
            JobTally::failed(e.to_string())
        }
    };

    EndpointTally {
        endpoint: endpoint.clone(),
        tally,
    }
}

/// Tally every endpoint, at most `concurrency` at a time.
///
/// The result holds one row per endpoint, sorted by endpoint.
pub async fn collect_all<Q: JobQueue + ?Sized>(
    queue: &Q,
    endpoints: &EndpointSet,
    concurrency: usize,
) -> Vec<EndpointTally> {
    let mut rows: Vec<EndpointTally> = stream::iter(endpoints.iter())
        .map(|endpoint| collect_tally(queue, endpoint))
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;
    rows.sort_by(|a, b| a.endpoint.cmp(&b.endpoint));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condor::mock::MockJobQueue;
    use crate::condor::status::JobStatus;
    use crate::condor::traits::QueryError;

    fn endpoints(hosts: &[&str]) -> EndpointSet {
        hosts.iter().map(|h| Endpoint::new(*h).unwrap()).collect()
    }

    #[tokio::test]
    async fn unknown_status_becomes_error_tally() {
        let queue = MockJobQueue::new().with_statuses("ce1.example.org", vec![1, 42]);
        let endpoint = Endpoint::new("ce1.example.org").unwrap();

        let row = collect_tally(&queue, &endpoint).await;
        assert_eq!(
            row.tally.communication_error(),
            Some("unknown job status code 42")
        );
        assert_eq!(row.tally.total(), 0);
    }

    #[tokio::test]
    async fn failure_is_isolated() {
        let queue = MockJobQueue::new()
            .with_statuses("ce1.example.org", vec![2, 2, 1])
            .with_failure(
                "ce2.example.org",
                QueryError::Timeout {
                    program: "condor_q".to_string(),
                    timeout: std::time::Duration::from_secs(60),
                },
            )
            .with_statuses("ce3.example.org", vec![5]);

        let rows = collect_all(
            &queue,
            &endpoints(&["ce3.example.org", "ce2.example.org", "ce1.example.org"]),
            4,
        )
        .await;

        let hosts: Vec<_> = rows.iter().map(|r| r.endpoint.as_str()).collect();
        assert_eq!(
            hosts,
            vec!["ce1.example.org", "ce2.example.org", "ce3.example.org"]
        );
        assert_eq!(rows[0].tally.count(JobStatus::Running), 2);
        assert_eq!(rows[0].tally.count(JobStatus::Idle), 1);
        assert_eq!(
            rows[1].tally.communication_error(),
            Some("condor_q timed out after 60s")
        );
        assert_eq!(rows[2].tally.count(JobStatus::Held), 1);
        assert_eq!(queue.queried().len(), 3);
    }

    #[tokio::test]
    async fn sequential_matches_parallel() {
        let queue = MockJobQueue::new()
            .with_statuses("ce1.example.org", vec![1])
            .with_statuses("ce2.example.org", vec![2, 3, 4]);
        let set = endpoints(&["ce1.example.org", "ce2.example.org", "ce3.example.org"]);

        let sequential = collect_all(&queue, &set, 1).await;
        let parallel = collect_all(&queue, &set, 8).await;
        assert_eq!(sequential, parallel);
    }

    #[tokio::test]
    async fn zero_concurrency_still_runs() {
        let queue = MockJobQueue::new().with_statuses("ce1.example.org", vec![]);
        let rows = collect_all(&queue, &endpoints(&["ce1.example.org"]), 0).await;
        assert_eq!(rows.len(), 1);
        assert!(rows[0].tally.is_ok());
    }

    #[tokio::test]
    async fn empty_set_is_empty_report() {
        let queue = MockJobQueue::new();
        assert!(collect_all(&queue, &EndpointSet::new(), 4).await.is_empty());
    }
}
