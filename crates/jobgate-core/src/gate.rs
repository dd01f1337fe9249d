//! OR-gate evaluation of a classified job group.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::classify::Classification;

/// Ternary result of one evaluation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// At least one job in the group succeeded.
    Success,
    /// Every counted job completed and none succeeded.
    Failure,
    /// Nothing succeeded yet and some jobs are still running.
    Pending,
}

impl Verdict {
    /// Whether the verdict ends the evaluate loop.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Verdict::Pending)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Verdict::Success => "success",
            Verdict::Failure => "failure",
            Verdict::Pending => "pending",
        })
    }
}

/// OR gate over a job group.
pub struct OrGate;

impl OrGate {
    /// Decide the verdict for a classification.
    ///
    /// Precedence:
    /// - any success wins, even while other jobs are pending or failed
    /// - otherwise any pending job keeps the gate open
    /// - otherwise the group failed
    pub fn evaluate(classification: &Classification) -> Verdict {
        if classification.succeeded > 0 {
            Verdict::Success
        } else if classification.pending > 0 {
            Verdict::Pending
        } else {
            Verdict::Failure
        }
    }
}
