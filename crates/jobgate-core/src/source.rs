//! Job page fetching
//!
//! [`JobSource`] is the seam between the gate engine and the pipeline-status
//! API. [`GitHubJobSource`] talks to the GitHub Actions REST endpoint for one
//! workflow run; tests use [`crate::fakes::ScriptedJobSource`].

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::{GateError, Result};
use crate::job::{Job, JobPage, RunIdentity};

/// Source of job pages for one workflow run.
#[async_trait]
pub trait JobSource: Send + Sync {
    /// Fetch one page (1-based) of the run's jobs.
    ///
    /// Fails with [`GateError::Transport`] when the request does not complete
    /// or returns a non-success status, and with [`GateError::Decode`] when the
    /// body does not have the expected shape.
    async fn fetch_page(&self, page: u32, per_page: u32) -> Result<JobPage>;
}

/// Response body of the jobs listing. Unknown fields are ignored.
#[derive(Debug, Deserialize)]
struct JobsResponse {
    jobs: Vec<Job>,
}

/// Longest slice of an error body carried into a transport error.
const ERROR_BODY_LIMIT: usize = 256;

/// GitHub Actions jobs API client for one run.
pub struct GitHubJobSource {
    identity: RunIdentity,
    http_client: reqwest::Client,
}

impl GitHubJobSource {
    /// Create a client for the given run.
    pub fn new(identity: RunIdentity) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("jobgate/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(GitHubJobSource {
            identity,
            http_client,
        })
    }

    pub fn identity(&self) -> &RunIdentity {
        &self.identity
    }
}

#[async_trait]
impl JobSource for GitHubJobSource {
    async fn fetch_page(&self, page: u32, per_page: u32) -> Result<JobPage> {
        let url = self.identity.jobs_url();
        debug!(%url, page, per_page, "Fetching job page");

        let response = self
            .http_client
            .get(&url)
            .query(&[("page", page), ("per_page", per_page)])
            .bearer_auth(&self.identity.auth_token)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let snippet: String = body.chars().take(ERROR_BODY_LIMIT).collect();
            return Err(GateError::Transport(format!(
                "jobs API returned {status} for page {page}: {snippet}"
            )));
        }

        let body = response.text().await?;
        let decoded: JobsResponse = serde_json::from_str(&body)?;

        let page = JobPage::new(decoded.jobs);
        debug!(count = page.count, "Decoded job page");
        Ok(page)
    }
}
