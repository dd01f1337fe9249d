//! jobgate - OR gate over a group of CI jobs
//!
//! Polls the jobs of one workflow run, keeps the jobs whose name matches a
//! pattern and reports:
//! - success as soon as any matched job succeeded
//! - failure once every matched job completed without success
//! - pending otherwise, retried on a bounded fixed-delay schedule

pub mod aggregate;
pub mod classify;
pub mod config;
pub mod error;
pub mod fakes;
pub mod filter;
pub mod gate;
pub mod job;
pub mod retry;
pub mod source;
pub mod telemetry;

// Re-export key types
pub use aggregate::{collect_jobs, PAGE_SIZE};
pub use classify::{classify, Classification};
pub use config::{GateConfig, GateInputs, DEFAULT_BASE_URL};
pub use error::{GateError, Result};
pub use filter::NamePattern;
pub use gate::{OrGate, Verdict};
pub use job::{Conclusion, Job, JobPage, JobStatus, RunIdentity};
pub use retry::{GateOutcome, RetryPolicy, RetryScheduler};
pub use source::{GitHubJobSource, JobSource};
pub use telemetry::init_tracing;
