//! Job name filtering.

use regex::Regex;
use std::fmt;

use crate::error::Result;
use crate::job::Job;

/// Regular expression selecting the jobs that form the gated group.
///
/// Matching is unanchored: a job matches when the pattern occurs anywhere in
/// its name.
#[derive(Clone)]
pub struct NamePattern {
    regex: Regex,
}

impl NamePattern {
    /// Compile a pattern, failing with [`crate::GateError::Pattern`].
    pub fn new(pattern: &str) -> Result<Self> {
        Ok(Self {
            regex: Regex::new(pattern)?,
        })
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn is_match(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }

    /// Jobs whose name matches, in their original order.
    ///
    /// The source list is left untouched; matches are cloned out of it.
    pub fn filter(&self, jobs: &[Job]) -> Vec<Job> {
        jobs.iter()
            .filter(|job| self.is_match(&job.name))
            .cloned()
            .collect()
    }
}

impl fmt::Debug for NamePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NamePattern").field(&self.as_str()).finish()
    }
}

impl fmt::Display for NamePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GateError;
    use crate::job::Conclusion;

    fn sample() -> Vec<Job> {
        vec![
            Job::completed("build (ubuntu)", Conclusion::Success),
            Job::in_progress("lint"),
            Job::completed("build (macos)", Conclusion::Failure),
            Job::queued("deploy-build-cache"),
            Job::queued("test"),
        ]
    }

    #[test]
    fn test_unanchored_match_preserves_order() {
        let pattern = NamePattern::new("build").expect("pattern");
        let names: Vec<_> = pattern
            .filter(&sample())
            .into_iter()
            .map(|j| j.name)
            .collect();
        assert_eq!(
            names,
            vec!["build (ubuntu)", "build (macos)", "deploy-build-cache"]
        );
    }

    #[test]
    fn test_anchored_pattern_is_honoured() {
        let pattern = NamePattern::new(r"^build \(").expect("pattern");
        assert_eq!(pattern.filter(&sample()).len(), 2);
    }

    #[test]
    fn test_source_list_unchanged() {
        let jobs = sample();
        let before = jobs.clone();
        let pattern = NamePattern::new("lint").expect("pattern");
        let matched = pattern.filter(&jobs);
        assert_eq!(matched.len(), 1);
        assert_eq!(jobs, before);
    }

    #[test]
    fn test_no_match_and_empty_input() {
        let pattern = NamePattern::new("release").expect("pattern");
        assert!(pattern.filter(&sample()).is_empty());
        assert!(pattern.filter(&[]).is_empty());
    }

    #[test]
    fn test_every_kept_job_matches_and_no_match_is_dropped() {
        let pattern = NamePattern::new("(ubuntu|test)$").expect("pattern");
        let jobs = sample();
        let matched = pattern.filter(&jobs);
        for job in &jobs {
            assert_eq!(
                matched.iter().any(|m| m.name == job.name),
                pattern.is_match(&job.name)
            );
        }
    }

    #[test]
    fn test_invalid_pattern() {
        let err = NamePattern::new("build (").unwrap_err();
        assert!(matches!(err, GateError::Pattern(_)));
    }
}
