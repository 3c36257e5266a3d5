//! condor::mock
//!
//! Mock job queue for deterministic testing.
//!
//! # Example
//!
//! ```
//! use ce_census::condor::mock::MockJobQueue;
//! use ce_census::condor::{JobQueue, QueryError};
//! use ce_census::core::types::Endpoint;
//!
//! # tokio_test::block_on(async {
//! let queue = MockJobQueue::new()
//!     .with_statuses("ce1.example.org", vec![1, 2, 2])
//!     .with_failure("ce2.example.org", QueryError::MalformedOutput("x".into()));
//!
//! let ce1 = Endpoint::new("ce1.example.org").unwrap();
//! assert_eq!(queue.job_statuses(&ce1).await.unwrap(), vec![1, 2, 2]);
//! # });
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::traits::{JobQueue, QueryError};
use crate::core::types::Endpoint;

/// Mock job queue with canned answers per endpoint.
///
/// Endpoints without a canned answer fail with `ScheddNotFound`.
/// Clones share the query log.
#[derive(Debug, Clone, Default)]
pub struct MockJobQueue {
    responses: HashMap<String, Result<Vec<i64>, QueryError>>,
    queried: Arc<Mutex<Vec<Endpoint>>>,
}

impl MockJobQueue {
    /// Create a queue that knows no endpoints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer queries for `endpoint` with `statuses`.
    pub fn with_statuses(mut self, endpoint: &str, statuses: Vec<i64>) -> Self {
        self.responses.insert(endpoint.to_string(), Ok(statuses));
        self
    }

    /// Fail queries for `endpoint` with `error`.
    pub fn with_failure(mut self, endpoint: &str, error: QueryError) -> Self {
        self.responses.insert(endpoint.to_string(), Err(error));
        self
    }

    /// Endpoints queried so far, in query order.
    pub fn queried(&self) -> Vec<Endpoint> {
        match self.queried.lock() {
            Ok(log) => log.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl JobQueue for MockJobQueue {
    async fn job_statuses(&self, endpoint: &Endpoint) -> Result<Vec<i64>, QueryError> {
        match self.queried.lock() {
            Ok(mut log) => log.push(endpoint.clone()),
            Err(poisoned) => poisoned.into_inner().push(endpoint.clone()),
        }

        match self.responses.get(endpoint.as_str()) {
            Some(response) => response.clone(),
            None => Err(QueryError::ScheddNotFound {
                pool: endpoint.to_string(),
            }),
        }
    }
}
