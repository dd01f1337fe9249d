//! Job data model as reported by the workflow jobs API.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a job.
///
/// Status strings outside the recognized set are kept verbatim in
/// [`JobStatus::Other`] so they can be reported instead of miscounted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStatus {
    Queued,
    InProgress,
    Completed,
    Other(String),
}

impl JobStatus {
    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::InProgress => "in_progress",
            JobStatus::Completed => "completed",
            JobStatus::Other(raw) => raw,
        }
    }
}

impl From<String> for JobStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "queued" => JobStatus::Queued,
            "in_progress" => JobStatus::InProgress,
            "completed" => JobStatus::Completed,
            _ => JobStatus::Other(raw),
        }
    }
}

impl From<JobStatus> for String {
    fn from(status: JobStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a completed job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Conclusion {
    Success,
    Failure,
    /// cancelled, skipped, timed_out, neutral, ...
    Other(String),
}

impl Conclusion {
    pub fn as_str(&self) -> &str {
        match self {
            Conclusion::Success => "success",
            Conclusion::Failure => "failure",
            Conclusion::Other(raw) => raw,
        }
    }
}

impl From<String> for Conclusion {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "success" => Conclusion::Success,
            "failure" => Conclusion::Failure,
            _ => Conclusion::Other(raw),
        }
    }
}

impl From<Conclusion> for String {
    fn from(conclusion: Conclusion) -> Self {
        conclusion.as_str().to_string()
    }
}

/// One job of a workflow run, projected to the fields the gate needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub name: String,
    pub status: JobStatus,
    /// Only meaningful when `status` is [`JobStatus::Completed`].
    #[serde(default)]
    pub conclusion: Option<Conclusion>,
}

impl Job {
    pub fn new(name: impl Into<String>, status: JobStatus, conclusion: Option<Conclusion>) -> Self {
        Self {
            name: name.into(),
            status,
            conclusion,
        }
    }

    /// A job that has not started yet.
    pub fn queued(name: impl Into<String>) -> Self {
        Self::new(name, JobStatus::Queued, None)
    }

    /// A job that is currently running.
    pub fn in_progress(name: impl Into<String>) -> Self {
        Self::new(name, JobStatus::InProgress, None)
    }

    /// A finished job with the given conclusion.
    pub fn completed(name: impl Into<String>, conclusion: Conclusion) -> Self {
        Self::new(name, JobStatus::Completed, Some(conclusion))
    }

    /// Human-readable `status/conclusion` label for diagnostics.
    pub fn state_label(&self) -> String {
        match (&self.status, &self.conclusion) {
            (JobStatus::Completed, Some(c)) => format!("completed/{}", c.as_str()),
            (status, _) => status.to_string(),
        }
    }
}

/// One decoded page of the jobs listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobPage {
    pub jobs: Vec<Job>,
    /// Number of items the page carried.
    pub count: usize,
}

impl JobPage {
    pub fn new(jobs: Vec<Job>) -> Self {
        let count = jobs.len();
        Self { jobs, count }
    }
}

/// Addressing and credential data for one workflow run.
#[derive(Clone, PartialEq, Eq)]
pub struct RunIdentity {
    pub base_url: String,
    pub owner: String,
    pub repo: String,
    pub run_id: String,
    pub auth_token: String,
}

impl RunIdentity {
    /// URL of the run's jobs listing, without query parameters.
    pub fn jobs_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/actions/runs/{}/jobs",
            self.base_url.trim_end_matches('/'),
            self.owner,
            self.repo,
            self.run_id
        )
    }
}

impl fmt::Debug for RunIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunIdentity")
            .field("base_url", &self.base_url)
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("run_id", &self.run_id)
            .field("auth_token", &"<redacted>")
            .finish()
    }
}
