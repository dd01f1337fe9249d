//! In-memory fakes for the job source (testing only)
//!
//! [`ScriptedJobSource`] replays a queue of poll results. Each request for
//! page 1 starts a new poll and takes the next scripted entry; further pages
//! slice the current entry. Once the script runs out the last entry repeats.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::error::{GateError, Result};
use crate::job::{Job, JobPage};
use crate::source::JobSource;

type ErrorFactory = Box<dyn Fn() -> GateError + Send + Sync>;

enum Scripted {
    Jobs(Vec<Job>),
    Error(ErrorFactory),
}

#[derive(Default)]
struct ScriptState {
    queue: VecDeque<Scripted>,
    current: Option<Scripted>,
    requested_pages: Vec<u32>,
    polls: usize,
}

/// Job source that serves scripted job lists, one per poll.
#[derive(Default)]
pub struct ScriptedJobSource {
    state: Mutex<ScriptState>,
}

impl ScriptedJobSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a poll that returns `jobs` (paginated on request).
    pub fn then_jobs(self, jobs: Vec<Job>) -> Self {
        self.push(Scripted::Jobs(jobs));
        self
    }

    /// Queue a poll whose first page fails with the produced error.
    pub fn then_error<F>(self, make: F) -> Self
    where
        F: Fn() -> GateError + Send + Sync + 'static,
    {
        self.push(Scripted::Error(Box::new(make)));
        self
    }

    /// Every page number requested so far, in order.
    pub fn requested_pages(&self) -> Vec<u32> {
        self.lock().requested_pages.clone()
    }

    /// Number of polls started (requests for page 1).
    pub fn polls(&self) -> usize {
        self.lock().polls
    }

    fn push(&self, entry: Scripted) {
        self.lock().queue.push_back(entry);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ScriptState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl JobSource for ScriptedJobSource {
    async fn fetch_page(&self, page: u32, per_page: u32) -> Result<JobPage> {
        let mut state = self.lock();
        state.requested_pages.push(page);

        if page <= 1 {
            state.polls += 1;
            if let Some(next) = state.queue.pop_front() {
                state.current = Some(next);
            }
        }

        match &state.current {
            None => Ok(JobPage::default()),
            Some(Scripted::Error(make)) => Err(make()),
            Some(Scripted::Jobs(jobs)) => {
                let per_page = per_page.max(1) as usize;
                let start = (page.max(1) as usize - 1) * per_page;
                let slice = jobs.iter().skip(start).take(per_page).cloned().collect();
                Ok(JobPage::new(slice))
            }
        }
    }
}
