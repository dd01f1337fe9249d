//! Error types for the job gate

use thiserror::Error;

use crate::classify::Classification;

/// Errors that end a gate evaluation.
///
/// Recoverable conditions (no matching jobs yet, jobs still pending) are not
/// represented here; the scheduler turns them into retries and only their
/// exhaustion surfaces as an error.
#[derive(Error, Debug)]
pub enum GateError {
    /// Missing/blank required option or malformed retry parameter
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Network failure or non-success HTTP status
    #[error("Transport error: {0}")]
    Transport(String),

    /// Response body did not match the expected shape
    #[error("Decode error: {0}")]
    Decode(String),

    /// Job name pattern failed to compile
    #[error("Invalid job name pattern: {0}")]
    Pattern(String),

    /// Classification was asked to summarise zero jobs
    #[error("Cannot classify an empty job list")]
    EmptyInput,

    /// Every fetch-and-filter attempt produced no matching job
    #[error("No jobs matched the pattern after {attempts} attempt(s)")]
    NoMatchExhausted { attempts: u32 },

    /// Matched jobs were still pending when the evaluate loop ran out
    #[error("Jobs still pending after {attempts} evaluation(s): {last}")]
    PendingExhausted {
        attempts: u32,
        last: Classification,
    },

    /// The wait was interrupted by a shutdown signal
    #[error("Interrupted while waiting for jobs")]
    Interrupted,
}

impl GateError {
    /// Name of the stage that failed, for the exit diagnostic.
    pub fn stage(&self) -> &'static str {
        match self {
            GateError::Configuration(_) => "configuration",
            GateError::Transport(_) => "fetch",
            GateError::Decode(_) => "decode",
            GateError::Pattern(_) => "filter",
            GateError::EmptyInput => "classify",
            GateError::NoMatchExhausted { .. } => "fetch-and-filter",
            GateError::PendingExhausted { .. } => "evaluate",
            GateError::Interrupted => "signal",
        }
    }

    /// Process exit code for this error. Every failure maps to 1.
    pub fn exit_code(&self) -> i32 {
        1
    }
}

impl From<reqwest::Error> for GateError {
    fn from(err: reqwest::Error) -> Self {
        GateError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for GateError {
    fn from(err: serde_json::Error) -> Self {
        GateError::Decode(err.to_string())
    }
}

impl From<regex::Error> for GateError {
    fn from(err: regex::Error) -> Self {
        GateError::Pattern(err.to_string())
    }
}

/// Result type for gate operations
pub type Result<T> = std::result::Result<T, GateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_names() {
        assert_eq!(GateError::Configuration("x".into()).stage(), "configuration");
        assert_eq!(GateError::Transport("x".into()).stage(), "fetch");
        assert_eq!(GateError::Decode("x".into()).stage(), "decode");
        assert_eq!(GateError::Pattern("x".into()).stage(), "filter");
        assert_eq!(GateError::EmptyInput.stage(), "classify");
        assert_eq!(
            GateError::NoMatchExhausted { attempts: 3 }.stage(),
            "fetch-and-filter"
        );
    }

    #[test]
    fn test_every_error_exits_one() {
        assert_eq!(GateError::Interrupted.exit_code(), 1);
        assert_eq!(GateError::Decode("bad".into()).exit_code(), 1);
    }

    #[test]
    fn test_json_error_maps_to_decode() {
        let err: GateError = serde_json::from_str::<serde_json::Value>("{not json")
            .unwrap_err()
            .into();
        assert!(matches!(err, GateError::Decode(_)));
    }

    #[test]
    fn test_exhaustion_message_includes_attempts() {
        let err = GateError::NoMatchExhausted { attempts: 12 };
        assert!(err.to_string().contains("12 attempt"));
    }
}
