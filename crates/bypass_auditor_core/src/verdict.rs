//! Composition of the bypass verdict.
//!
//! The verdict is the logical OR of three independent gates:
//!
//! 1. A pull request must be associated with the commit.
//! 2. Every required status check must have passed on the pull request's head.
//! 3. The pull request must carry at least the required number of approvals.
//!
//! All gates are recorded, so a caller sees every violated condition rather than
//! only the first.

use std::fmt;

use serde::Serialize;

use crate::{checks::observed_state, CheckEvaluation, ReviewEvaluation};

#[cfg(test)]
#[path = "verdict_tests.rs"]
mod tests;

/// Why a gate was not evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The branch declares no such requirement.
    NotConfigured,
    /// There is no pull request to evaluate the requirement against.
    NoPullRequest,
}

/// A single violated merge condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    /// The commit reached the branch without a pull request.
    NoPullRequest,
    /// A required check did not pass on the pull request's head commit.
    FailedCheck {
        name: String,
        /// `false` when the check never ran on the head commit.
        found: bool,
        conclusion: Option<String>,
    },
    /// The pull request had fewer approving reviews than required.
    InsufficientApprovals { required: u32, approved: u32 },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::NoPullRequest => write!(f, "No PR associated with this push."),
            Violation::FailedCheck {
                name,
                found,
                conclusion,
            } => write!(
                f,
                "Required {} check did not pass (state: {}).",
                name,
                observed_state(*found, conclusion.as_deref())
            ),
            Violation::InsufficientApprovals { required, approved } => write!(
                f,
                "Insufficient approving reviews ({} of {} required).",
                approved, required
            ),
        }
    }
}

/// The result of auditing one commit.
///
/// Serializes with the output names used by the CI integration:
/// `merge_bypass_detected`, `commit_actor` and `commit_from_pr`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BypassVerdict {
    /// `true` if any merge condition was violated.
    #[serde(rename = "merge_bypass_detected")]
    pub detected: bool,
    /// Login of the commit's author, or `unknown`.
    #[serde(rename = "commit_actor")]
    pub actor: String,
    /// `true` if a pull request was associated with the commit.
    #[serde(rename = "commit_from_pr")]
    pub from_pull_request: bool,
    /// Every violated condition, in gate order.
    pub violations: Vec<Violation>,
}

/// Combines the gate results into a [`BypassVerdict`].
pub fn compose_verdict(
    actor: String,
    from_pull_request: bool,
    checks: &CheckEvaluation,
    reviews: &ReviewEvaluation,
) -> BypassVerdict {
    let mut violations = Vec::new();

    if !from_pull_request {
        violations.push(Violation::NoPullRequest);
    }

    violations.extend(checks.failures().into_iter().map(|o| Violation::FailedCheck {
        name: o.name.clone(),
        found: o.found,
        conclusion: o.conclusion.clone(),
    }));

    if let ReviewEvaluation::Evaluated { required, approved } = *reviews {
        if approved < required {
            violations.push(Violation::InsufficientApprovals { required, approved });
        }
    }

    BypassVerdict {
        detected: !violations.is_empty(),
        actor,
        from_pull_request,
        violations,
    }
}
