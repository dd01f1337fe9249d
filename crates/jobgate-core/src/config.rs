//! Gate configuration and validation.

use tracing::debug;

use crate::error::{GateError, Result};
use crate::filter::NamePattern;
use crate::job::RunIdentity;
use crate::retry::{RetryPolicy, RetryScheduler};
use crate::source::GitHubJobSource;

/// Default jobs API root.
pub const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// Raw, unvalidated option values as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateInputs {
    pub pattern: String,
    pub base_url: String,
    pub owner: String,
    pub repo: String,
    pub run_id: String,
    pub auth_token: String,
    pub outer_retry_limit: String,
    pub outer_retry_delay_secs: String,
    pub inner_retry_limit: String,
    pub inner_retry_delay_secs: String,
}

impl Default for GateInputs {
    fn default() -> Self {
        GateInputs {
            pattern: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            owner: String::new(),
            repo: String::new(),
            run_id: String::new(),
            auth_token: String::new(),
            outer_retry_limit: RetryPolicy::DEFAULT_OUTER.max_attempts.to_string(),
            outer_retry_delay_secs: RetryPolicy::DEFAULT_OUTER.delay_secs.to_string(),
            inner_retry_limit: RetryPolicy::DEFAULT_INNER.max_attempts.to_string(),
            inner_retry_delay_secs: RetryPolicy::DEFAULT_INNER.delay_secs.to_string(),
        }
    }
}

/// Validated gate configuration.
#[derive(Debug, Clone)]
pub struct GateConfig {
    pub identity: RunIdentity,
    pub pattern: NamePattern,
    pub inner: RetryPolicy,
    pub outer: RetryPolicy,
}

impl GateConfig {
    /// Validate raw inputs.
    ///
    /// Blank required values and malformed retry numbers fail with
    /// [`GateError::Configuration`]; a pattern that does not compile fails
    /// with [`GateError::Pattern`]. Nothing here touches the network.
    pub fn from_inputs(inputs: &GateInputs) -> Result<Self> {
        let pattern = required("pattern", &inputs.pattern)?;
        let identity = RunIdentity {
            base_url: required("base-url", &inputs.base_url)?,
            owner: required("owner", &inputs.owner)?,
            repo: required("repo", &inputs.repo)?,
            run_id: required("run-id", &inputs.run_id)?,
            auth_token: required("token", &inputs.auth_token)?,
        };

        let outer = RetryPolicy::new(
            parse_count("outer-retry-limit", &inputs.outer_retry_limit)?,
            parse_count("outer-retry-delay", &inputs.outer_retry_delay_secs)?.into(),
        );
        let inner = RetryPolicy::new(
            parse_count("inner-retry-limit", &inputs.inner_retry_limit)?,
            parse_count("inner-retry-delay", &inputs.inner_retry_delay_secs)?.into(),
        );

        let pattern = NamePattern::new(&pattern)?;

        debug!(?identity, %pattern, ?inner, ?outer, "Validated gate configuration");
        Ok(GateConfig {
            identity,
            pattern,
            inner,
            outer,
        })
    }

    /// Build a scheduler backed by the GitHub jobs API.
    pub fn into_scheduler(self) -> Result<RetryScheduler<GitHubJobSource>> {
        let source = GitHubJobSource::new(self.identity)?;
        Ok(RetryScheduler::new(source, self.pattern)
            .with_inner_policy(self.inner)
            .with_outer_policy(self.outer))
    }
}

fn required(name: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(GateError::Configuration(format!(
            "missing required option '{name}'"
        )));
    }
    Ok(trimmed.to_string())
}

fn parse_count(name: &str, value: &str) -> Result<u32> {
    value.trim().parse::<u32>().map_err(|_| {
        GateError::Configuration(format!(
            "option '{name}' must be a non-negative integer, got '{value}'"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> GateInputs {
        GateInputs {
            pattern: "^build".to_string(),
            owner: "octo".to_string(),
            repo: "widgets".to_string(),
            run_id: "987654".to_string(),
            auth_token: "t0ken".to_string(),
            ..GateInputs::default()
        }
    }

    #[test]
    fn test_valid_inputs_use_defaults() {
        let config = GateConfig::from_inputs(&valid()).expect("config");
        assert_eq!(config.outer, RetryPolicy::DEFAULT_OUTER);
        assert_eq!(config.inner, RetryPolicy::DEFAULT_INNER);
        assert_eq!(config.identity.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.pattern.as_str(), "^build");
    }

    #[test]
    fn test_empty_pattern_is_configuration_error() {
        let inputs = GateInputs {
            pattern: String::new(),
            ..valid()
        };
        let err = GateConfig::from_inputs(&inputs).unwrap_err();
        assert!(matches!(err, GateError::Configuration(ref m) if m.contains("pattern")));
    }

    #[test]
    fn test_blank_required_values_rejected() {
        for (field, inputs) in [
            ("owner", GateInputs { owner: "  ".into(), ..valid() }),
            ("repo", GateInputs { repo: String::new(), ..valid() }),
            ("run-id", GateInputs { run_id: String::new(), ..valid() }),
            ("token", GateInputs { auth_token: String::new(), ..valid() }),
            ("base-url", GateInputs { base_url: String::new(), ..valid() }),
        ] {
            let err = GateConfig::from_inputs(&inputs).unwrap_err();
            assert!(
                matches!(err, GateError::Configuration(ref m) if m.contains(field)),
                "expected configuration error for {field}, got {err}"
            );
        }
    }

    #[test]
    fn test_non_integer_retry_values_rejected() {
        for inputs in [
            GateInputs { outer_retry_limit: "sixty".into(), ..valid() },
            GateInputs { outer_retry_delay_secs: "-5".into(), ..valid() },
            GateInputs { inner_retry_limit: "1.5".into(), ..valid() },
            GateInputs { inner_retry_delay_secs: String::new(), ..valid() },
        ] {
            let err = GateConfig::from_inputs(&inputs).unwrap_err();
            assert!(matches!(err, GateError::Configuration(_)));
        }
    }

    #[test]
    fn test_custom_retry_values() {
        let inputs = GateInputs {
            outer_retry_limit: " 5 ".into(),
            outer_retry_delay_secs: "0".into(),
            inner_retry_limit: "2".into(),
            inner_retry_delay_secs: "30".into(),
            ..valid()
        };
        let config = GateConfig::from_inputs(&inputs).expect("config");
        assert_eq!(config.outer, RetryPolicy::new(5, 0));
        assert_eq!(config.inner, RetryPolicy::new(2, 30));
    }

    #[test]
    fn test_bad_pattern_is_pattern_error() {
        let inputs = GateInputs {
            pattern: "deploy[".into(),
            ..valid()
        };
        let err = GateConfig::from_inputs(&inputs).unwrap_err();
        assert!(matches!(err, GateError::Pattern(_)));
    }
}
