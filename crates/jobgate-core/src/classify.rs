//! Status classification of a matched job group.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

use crate::error::{GateError, Result};
use crate::job::{Conclusion, Job, JobStatus};

/// Bucket counts for one matched job list.
///
/// `pending + succeeded + failed + unrecognized` equals the number of jobs
/// classified. Jobs with an unrecognized status are counted in none of the
/// three decision buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Queued or in progress.
    pub pending: u32,
    pub succeeded: u32,
    /// Completed with any conclusion other than success.
    pub failed: u32,
    /// Status outside the recognized set.
    pub unrecognized: u32,
}

impl Classification {
    /// Jobs that landed in a decision bucket.
    pub fn counted(&self) -> u32 {
        self.pending + self.succeeded + self.failed
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} succeeded, {} failed, {} pending",
            self.succeeded, self.failed, self.pending
        )?;
        if self.unrecognized > 0 {
            write!(f, ", {} unrecognized", self.unrecognized)?;
        }
        Ok(())
    }
}

/// Partition matched jobs into pending, succeeded and failed.
///
/// The conclusion is only looked at for completed jobs. An empty list is
/// rejected with [`GateError::EmptyInput`].
pub fn classify(jobs: &[Job]) -> Result<Classification> {
    if jobs.is_empty() {
        return Err(GateError::EmptyInput);
    }

    let mut counts = Classification::default();
    for job in jobs {
        match &job.status {
            JobStatus::Queued | JobStatus::InProgress => counts.pending += 1,
            JobStatus::Completed => match job.conclusion {
                Some(Conclusion::Success) => counts.succeeded += 1,
                _ => counts.failed += 1,
            },
            JobStatus::Other(raw) => {
                warn!(job = %job.name, status = %raw, "Unrecognized job status, excluded from gate");
                counts.unrecognized += 1;
            }
        }
    }

    Ok(counts)
}
