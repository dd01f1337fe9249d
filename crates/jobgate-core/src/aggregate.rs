//! Pagination across the jobs listing.

use tracing::debug;

use crate::error::Result;
use crate::job::Job;
use crate::source::JobSource;

/// Page size requested from the jobs API.
pub const PAGE_SIZE: u32 = 100;

/// Fetch every job of the run, one page at a time starting at page 1.
///
/// Stops at the first page carrying fewer than [`PAGE_SIZE`] items (a page of
/// zero included). There is no page cap; a source that only ever returns full
/// pages never terminates. Errors from the source propagate unchanged and
/// discard the pages collected so far.
pub async fn collect_jobs<S>(source: &S) -> Result<Vec<Job>>
where
    S: JobSource + ?Sized,
{
    let mut jobs = Vec::new();
    let mut page = 1u32;

    loop {
        let fetched = source.fetch_page(page, PAGE_SIZE).await?;
        let count = fetched.count;
        jobs.extend(fetched.jobs);

        if count < PAGE_SIZE as usize {
            break;
        }
        page += 1;
    }

    debug!(pages = page, total = jobs.len(), "Collected run jobs");
    Ok(jobs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GateError;
    use crate::fakes::ScriptedJobSource;
    use crate::job::Job;

    fn numbered(n: usize) -> Vec<Job> {
        (0..n).map(|i| Job::queued(format!("job-{i}"))).collect()
    }

    #[tokio::test]
    async fn test_single_short_page() {
        let source = ScriptedJobSource::new().then_jobs(numbered(7));
        let jobs = collect_jobs(&source).await.expect("collect");
        assert_eq!(jobs.len(), 7);
        assert_eq!(source.requested_pages(), vec![1]);
    }

    #[tokio::test]
    async fn test_multiple_pages_preserve_order() {
        let source = ScriptedJobSource::new().then_jobs(numbered(250));
        let jobs = collect_jobs(&source).await.expect("collect");
        assert_eq!(jobs.len(), 250);
        assert_eq!(jobs[0].name, "job-0");
        assert_eq!(jobs[249].name, "job-249");
        assert_eq!(source.requested_pages(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_exact_multiple_ends_on_empty_page() {
        let source = ScriptedJobSource::new().then_jobs(numbered(200));
        let jobs = collect_jobs(&source).await.expect("collect");
        assert_eq!(jobs.len(), 200);
        assert_eq!(source.requested_pages(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_empty_run() {
        let source = ScriptedJobSource::new().then_jobs(Vec::new());
        let jobs = collect_jobs(&source).await.expect("collect");
        assert!(jobs.is_empty());
        assert_eq!(source.requested_pages(), vec![1]);
    }

    #[tokio::test]
    async fn test_error_propagates() {
        let source = ScriptedJobSource::new()
            .then_error(|| GateError::Transport("connection reset".to_string()));
        let err = collect_jobs(&source).await.unwrap_err();
        assert!(matches!(err, GateError::Transport(_)));
    }
}
