//! Reconciliation of check runs against the required status checks.
//!
//! A pull request's head commit can carry several check runs with the same name,
//! one per attempt. Only the most recent attempt, the one in the check suite with
//! the largest id, decides whether a required check passed.

use std::collections::HashMap;

use github_client::{CheckRun, PolicyQueryClient};
use tracing::{error, info};

use crate::{AuditResult, AuditTarget, SkipReason};

#[cfg(test)]
#[path = "checks_tests.rs"]
mod tests;

/// State reported for a required check that has no run on the head commit.
pub const MISSING_RUN_STATE: &str = "undefined";

/// State reported for a run that exists but has not concluded yet.
pub const UNCONCLUDED_RUN_STATE: &str = "null";

/// The state shown for a check run in logs and annotations.
///
/// A run that never happened and a run that is still queued or in progress are
/// reported differently.
pub fn observed_state(found: bool, conclusion: Option<&str>) -> &str {
    match (found, conclusion) {
        (false, _) => MISSING_RUN_STATE,
        (true, None) => UNCONCLUDED_RUN_STATE,
        (true, Some(conclusion)) => conclusion,
    }
}

/// The verdict for one required check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    /// Name of the required check.
    pub name: String,
    /// `true` if a run with this name exists on the head commit.
    pub found: bool,
    /// Conclusion of the latest run, `None` if it has not concluded or never ran.
    pub conclusion: Option<String>,
    /// `true` only if a run exists and concluded with `success`.
    pub passed: bool,
}

impl CheckOutcome {
    /// The observed state as shown in logs.
    pub fn state(&self) -> &str {
        observed_state(self.found, self.conclusion.as_deref())
    }
}

/// Outcome of the required status check gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckEvaluation {
    /// The gate was not evaluated.
    Skipped(SkipReason),
    /// One outcome per required check, in requirement order.
    Evaluated(Vec<CheckOutcome>),
}

impl CheckEvaluation {
    /// Returns `true` if at least one required check did not pass.
    ///
    /// A skipped gate never fails.
    pub fn any_failed(&self) -> bool {
        match self {
            CheckEvaluation::Skipped(_) => false,
            CheckEvaluation::Evaluated(outcomes) => outcomes.iter().any(|o| !o.passed),
        }
    }

    /// The required checks that did not pass.
    pub fn failures(&self) -> Vec<&CheckOutcome> {
        match self {
            CheckEvaluation::Skipped(_) => Vec::new(),
            CheckEvaluation::Evaluated(outcomes) => outcomes.iter().filter(|o| !o.passed).collect(),
        }
    }
}

/// Keeps one check run per name: the one with the largest check suite id.
///
/// A run only replaces the kept one when its suite id is strictly greater, so on a
/// tie the run seen first wins.
pub fn reconcile_check_runs(runs: Vec<CheckRun>) -> HashMap<String, CheckRun> {
    runs.into_iter().fold(HashMap::new(), |mut latest, run| {
        let newer = latest
            .get(&run.name)
            .map_or(true, |kept: &CheckRun| run.suite_id() > kept.suite_id());
        if newer {
            latest.insert(run.name.clone(), run);
        }
        latest
    })
}

/// Compares the reconciled check runs with the required checks.
///
/// Every required check is reported, passing or not.
pub fn evaluate_required_checks(
    required: &[String],
    latest: &HashMap<String, CheckRun>,
) -> Vec<CheckOutcome> {
    required
        .iter()
        .map(|name| {
            let run = latest.get(name);
            let outcome = CheckOutcome {
                name: name.clone(),
                found: run.is_some(),
                conclusion: run.and_then(|r| r.conclusion.clone()),
                passed: run.is_some_and(CheckRun::is_success),
            };

            if outcome.passed {
                info!(
                    check = %outcome.name,
                    state = outcome.state(),
                    " -> Required {} check passed (state: {}).",
                    outcome.name,
                    outcome.state()
                );
            } else {
                error!(
                    check = %outcome.name,
                    state = outcome.state(),
                    " -> Required {} check did not pass (state: {}).",
                    outcome.name,
                    outcome.state()
                );
            }
            outcome
        })
        .collect()
}

/// Fetches the check runs of a pull request's head commit and evaluates the
/// required checks against them.
///
/// # Errors
///
/// Returns `AuditError::Transport` if the check runs cannot be fetched.
pub async fn reconcile_required_checks(
    client: &dyn PolicyQueryClient,
    target: &AuditTarget,
    required: &[String],
    head_sha: &str,
) -> AuditResult<CheckEvaluation> {
    info!(head_sha = head_sha, "Fetching PR checks...");
    let runs = client
        .list_check_runs_for_ref(&target.owner, &target.repo, head_sha)
        .await?;

    let latest = reconcile_check_runs(runs);
    Ok(CheckEvaluation::Evaluated(evaluate_required_checks(
        required, &latest,
    )))
}
