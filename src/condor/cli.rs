//! condor::cli
//!
//! Job queue backend driven by the HTCondor command-line tools.
//!
//! # Query
//!
//! Two commands per endpoint, both pointed at the CE's collector:
//!
//! 1. `condor_status -pool <ep>:<port> -schedd -af Name` names the schedd.
//! 2. `condor_q -pool <ep>:<port> -name <schedd> -allusers
//!    -constraint "(RoutedJob =!= True)" -af JobStatus` prints one status code
//!    per job.
//!
//! Each command is bounded by the configured timeout. A child that outlives
//! its timeout is killed.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use super::traits::{JobQueue, QueryError};
use crate::core::types::Endpoint;

/// Excludes jobs the CE's job router derived from incoming jobs.
pub const NOT_ROUTED_CONSTRAINT: &str = "(RoutedJob =!= True)";

/// HTCondor command-line job queue.
#[derive(Debug, Clone)]
pub struct CondorCli {
    condor_q: String,
    condor_status: String,
    port: u16,
    timeout: Duration,
}

impl CondorCli {
    /// Query collectors on `port`, bounding each command by `timeout`.
    pub fn new(port: u16, timeout: Duration) -> Self {
        Self {
            condor_q: "condor_q".to_string(),
            condor_status: "condor_status".to_string(),
            port,
            timeout,
        }
    }

    /// Use other `condor_q` and `condor_status` executables.
    pub fn with_programs(
        mut self,
        condor_q: impl Into<String>,
        condor_status: impl Into<String>,
    ) -> Self {
        self.condor_q = condor_q.into();
        self.condor_status = condor_status.into();
        self
    }

    /// Collector address of `endpoint`.
    pub fn pool(&self, endpoint: &Endpoint) -> String {
        format!("{}:{}", endpoint, self.port)
    }

    /// Name of the schedd advertised in `pool`.
    pub async fn locate_schedd(&self, pool: &str) -> Result<String, QueryError> {
        let stdout = self
            .run(&self.condor_status, &["-pool", pool, "-schedd", "-af", "Name"])
            .await?;
        parse_schedd_name(&stdout).ok_or_else(|| QueryError::ScheddNotFound {
            pool: pool.to_string(),
        })
    }

    async fn run(&self, program: &str, args: &[&str]) -> Result<String, QueryError> {
        debug!(program, ?args, "running");
        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| QueryError::Spawn {
                program: program.to_string(),
                message: e.to_string(),
            })?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| QueryError::Timeout {
                program: program.to_string(),
                timeout: self.timeout,
            })?
            .map_err(|e| QueryError::Spawn {
                program: program.to_string(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(QueryError::CommandFailed {
                program: program.to_string(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl JobQueue for CondorCli {
    async fn job_statuses(&self, endpoint: &Endpoint) -> Result<Vec<i64>, QueryError> {
        let pool = self.pool(endpoint);
        let schedd = self.locate_schedd(&pool).await?;
        debug!(%endpoint, %schedd, "located schedd");

        let stdout = self
            .run(
                &self.condor_q,
                &[
                    "-pool",
                    &pool,
                    "-name",
                    &schedd,
                    "-allusers",
                    "-constraint",
                    NOT_ROUTED_CONSTRAINT,
                    "-af",
                    "JobStatus",
                ],
            )
            .await?;
        parse_job_statuses(&stdout)
    }
}

/// First non-empty line of `condor_status -af Name` output.
pub fn parse_schedd_name(stdout: &str) -> Option<String> {
    stdout
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

/// One status code per non-empty line of `condor_q -af JobStatus` output.
pub fn parse_job_statuses(stdout: &str) -> Result<Vec<i64>, QueryError> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            line.parse::<i64>()
                .map_err(|_| QueryError::MalformedOutput(line.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    mod parse {
        use super::*;

        #[test]
        fn schedd_name_first_line() {
            assert_eq!(
                parse_schedd_name("\n  ce1.example.org  \nother\n"),
                Some("ce1.example.org".to_string())
            );
            assert_eq!(parse_schedd_name(""), None);
            assert_eq!(parse_schedd_name(" \n\n"), None);
        }

        #[test]
        fn job_statuses() {
            assert_eq!(parse_job_statuses("1\n2\n\n5\n").unwrap(), vec![1, 2, 5]);
            assert!(parse_job_statuses("").unwrap().is_empty());
        }

        #[test]
        fn undefined_status_is_malformed() {
            assert_eq!(
                parse_job_statuses("1\nundefined\n"),
                Err(QueryError::MalformedOutput("undefined".to_string()))
            );
        }
    }

    #[test]
    fn pool_uses_port() {
        let cli = CondorCli::new(9619, Duration::from_secs(1));
        let endpoint = Endpoint::new("ce1.example.org").unwrap();
        assert_eq!(cli.pool(&endpoint), "ce1.example.org:9619");
    }

    #[tokio::test]
    async fn missing_program_is_spawn_error() {
        let cli = CondorCli::new(9619, Duration::from_secs(5))
            .with_programs("/nonexistent/condor_q", "/nonexistent/condor_status");
        let endpoint = Endpoint::new("ce1.example.org").unwrap();

        let err = cli.job_statuses(&endpoint).await.unwrap_err();
        assert!(matches!(err, QueryError::Spawn { ref program, .. } if program == "/nonexistent/condor_status"));
    }

    #[cfg(unix)]
    mod fake_tools {
        use super::*;
        use std::fs;
        use std::os::unix::fs::PermissionsExt;
        use std::path::{Path, PathBuf};
        use tempfile::TempDir;

        fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
            let path = dir.join(name);
            fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        fn cli(q: &Path, status: &Path, timeout: Duration) -> CondorCli {
            CondorCli::new(9619, timeout)
                .with_programs(q.to_string_lossy(), status.to_string_lossy())
        }

        #[tokio::test]
        async fn passes_pool_schedd_and_constraint() {
            let dir = TempDir::new().unwrap();
            let args_log = dir.path().join("args");
            let status = script(dir.path(), "condor_status", "echo schedd.example.org");
            let q = script(
                dir.path(),
                "condor_q",
                &format!(
                    "for a in \"$@\"; do echo \"$a\" >> {}; done\nprintf '1\\n2\\n2\\n'",
                    args_log.display()
                ),
            );

            let endpoint = Endpoint::new("ce1.example.org").unwrap();
            let statuses = cli(&q, &status, Duration::from_secs(10))
                .job_statuses(&endpoint)
                .await
                .unwrap();
            assert_eq!(statuses, vec![1, 2, 2]);

            let args = fs::read_to_string(&args_log).unwrap();
            let args: Vec<&str> = args.lines().collect();
            assert_eq!(
                args,
                vec![
                    "-pool",
                    "ce1.example.org:9619",
                    "-name",
                    "schedd.example.org",
                    "-allusers",
                    "-constraint",
                    "(RoutedJob =!= True)",
                    "-af",
                    "JobStatus",
                ]
            );
        }

        #[tokio::test]
        async fn empty_collector_is_schedd_not_found() {
            let dir = TempDir::new().unwrap();
            let status = script(dir.path(), "condor_status", "true");
            let q = script(dir.path(), "condor_q", "echo 1");

            let endpoint = Endpoint::new("ce1.example.org").unwrap();
            let err = cli(&q, &status, Duration::from_secs(10))
                .job_statuses(&endpoint)
                .await
                .unwrap_err();
            assert_eq!(
                err,
                QueryError::ScheddNotFound {
                    pool: "ce1.example.org:9619".to_string()
                }
            );
        }

        #[tokio::test]
        async fn nonzero_exit_is_command_failed() {
            let dir = TempDir::new().unwrap();
            let status = script(dir.path(), "condor_status", "echo schedd.example.org");
            let q = script(dir.path(), "condor_q", "echo 'Failed to connect' >&2\nexit 1");

            let endpoint = Endpoint::new("ce1.example.org").unwrap();
            let err = cli(&q, &status, Duration::from_secs(10))
                .job_statuses(&endpoint)
                .await
                .unwrap_err();
            match err {
                QueryError::CommandFailed { code, stderr, .. } => {
                    assert_eq!(code, Some(1));
                    assert_eq!(stderr, "Failed to connect");
                }
                other => panic!("unexpected error: {:?}", other),
            }
        }

        #[tokio::test]
        async fn slow_collector_times_out() {
            let dir = TempDir::new().unwrap();
            let status = script(dir.path(), "condor_status", "exec sleep 30");
            let q = script(dir.path(), "condor_q", "echo 1");

            let endpoint = Endpoint::new("ce1.example.org").unwrap();
            let err = cli(&q, &status, Duration::from_millis(200))
                .job_statuses(&endpoint)
                .await
                .unwrap_err();
            assert!(matches!(err, QueryError::Timeout { .. }));
            assert!(err.to_string().ends_with("timed out after 200ms"), "{}", err);
        }
    }
}
