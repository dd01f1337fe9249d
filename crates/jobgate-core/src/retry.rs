//! Bounded retry scheduling for the gate
//!
//! Two nested fixed-delay loops drive the evaluation:
//! - the inner loop re-fetches and re-filters the run's jobs until at least
//!   one job matches the pattern
//! - the outer loop re-runs the inner loop, classifies and evaluates the
//!   matched group until the verdict is terminal
//!
//! Every outer iteration starts from a fresh fetch. Fatal errors from the
//! fetch, decode or filter stages abort both loops immediately.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

use crate::aggregate::collect_jobs;
use crate::classify::{classify, Classification};
use crate::error::{GateError, Result};
use crate::filter::NamePattern;
use crate::gate::{OrGate, Verdict};
use crate::job::Job;
use crate::source::JobSource;

/// Fixed-delay retry bound for one loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Attempts allowed before giving up. Zero behaves like one.
    pub max_attempts: u32,
    /// Sleep between attempts, in seconds.
    pub delay_secs: u64,
}

impl RetryPolicy {
    /// Fetch-and-filter defaults: 12 attempts, 5 minutes apart.
    pub const DEFAULT_INNER: RetryPolicy = RetryPolicy::new(12, 300);

    /// Evaluate defaults: 60 attempts, 5 minutes apart.
    pub const DEFAULT_OUTER: RetryPolicy = RetryPolicy::new(60, 300);

    pub const fn new(max_attempts: u32, delay_secs: u64) -> Self {
        Self {
            max_attempts,
            delay_secs,
        }
    }

    pub fn delay(&self) -> Duration {
        Duration::from_secs(self.delay_secs)
    }

    /// Whether `attempts` made so far uses up the budget.
    pub fn is_exhausted(&self, attempts: u32) -> bool {
        attempts >= self.max_attempts
    }
}

/// Terminal result of a gate run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateOutcome {
    /// Success or Failure; never Pending.
    pub verdict: Verdict,
    pub classification: Classification,
    /// Matched jobs from the deciding poll.
    pub matched: Vec<Job>,
    /// Evaluations performed, the deciding one included.
    pub outer_attempts: u32,
}

impl GateOutcome {
    /// Process exit code: 0 on success, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        match self.verdict {
            Verdict::Success => 0,
            _ => 1,
        }
    }
}

/// Drives fetch, filter, classify and evaluate until a terminal verdict.
pub struct RetryScheduler<S> {
    source: S,
    pattern: NamePattern,
    inner: RetryPolicy,
    outer: RetryPolicy,
}

impl<S: JobSource> RetryScheduler<S> {
    /// Create a scheduler with the default policies.
    pub fn new(source: S, pattern: NamePattern) -> Self {
        Self {
            source,
            pattern,
            inner: RetryPolicy::DEFAULT_INNER,
            outer: RetryPolicy::DEFAULT_OUTER,
        }
    }

    /// Set the fetch-and-filter policy.
    pub fn with_inner_policy(mut self, policy: RetryPolicy) -> Self {
        self.inner = policy;
        self
    }

    /// Set the evaluate policy.
    pub fn with_outer_policy(mut self, policy: RetryPolicy) -> Self {
        self.outer = policy;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch the run's jobs and filter them until at least one matches.
    ///
    /// An empty run and a run with no matching job are treated the same.
    /// Fails with [`GateError::NoMatchExhausted`] once the inner policy is
    /// used up.
    pub async fn fetch_matched(&self) -> Result<Vec<Job>> {
        let mut attempts = 0u32;

        loop {
            attempts += 1;
            let jobs = collect_jobs(&self.source).await?;
            let matched = self.pattern.filter(&jobs);

            if !matched.is_empty() {
                info!(
                    attempt = attempts,
                    total = jobs.len(),
                    matched = matched.len(),
                    "Matched jobs"
                );
                return Ok(matched);
            }

            if self.inner.is_exhausted(attempts) {
                return Err(GateError::NoMatchExhausted { attempts });
            }

            warn!(
                attempt = attempts,
                max_attempts = self.inner.max_attempts,
                total = jobs.len(),
                pattern = %self.pattern,
                delay_secs = self.inner.delay_secs,
                "No jobs matched, retrying"
            );
            tokio::time::sleep(self.inner.delay()).await;
        }
    }

    /// Evaluate the matched group until the verdict is Success or Failure.
    ///
    /// Fails with [`GateError::PendingExhausted`] when jobs are still pending
    /// after the outer policy is used up.
    pub async fn run(&self) -> Result<GateOutcome> {
        let mut attempts = 0u32;

        loop {
            attempts += 1;
            let matched = self.fetch_matched().await?;
            let classification = classify(&matched)?;
            let verdict = OrGate::evaluate(&classification);

            info!(
                attempt = attempts,
                %verdict,
                succeeded = classification.succeeded,
                failed = classification.failed,
                pending = classification.pending,
                "Evaluated job group"
            );

            if verdict.is_terminal() {
                return Ok(GateOutcome {
                    verdict,
                    classification,
                    matched,
                    outer_attempts: attempts,
                });
            }

            if self.outer.is_exhausted(attempts) {
                return Err(GateError::PendingExhausted {
                    attempts,
                    last: classification,
                });
            }

            tokio::time::sleep(self.outer.delay()).await;
        }
    }
}
