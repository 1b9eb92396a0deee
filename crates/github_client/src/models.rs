//! # Models
//!
//! This module contains the data models returned by the GitHub queries the merge
//! auditor relies on: commits, the pull requests associated with a commit, check
//! runs and pull request reviews.
//!
//! The models only carry the fields the auditor reads. Everything else in the
//! GitHub payloads is ignored during deserialization.

use serde::{Deserialize, Serialize};

use crate::User;

#[cfg(test)]
#[path = "models_tests.rs"]
mod tests;

/// A commit as returned by `GET /repos/{owner}/{repo}/commits/{ref}`.
///
/// `author` and `committer` are the GitHub accounts linked to the git identities.
/// GitHub sends `null` when an identity's email is not associated with any account.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct CommitDetail {
    /// The full commit SHA
    pub sha: String,
    /// GitHub account of the commit author, if one could be linked
    #[serde(default)]
    pub author: Option<User>,
    /// GitHub account of the committer, if one could be linked
    #[serde(default)]
    pub committer: Option<User>,
}

/// A pull request as listed by `GET /repos/{owner}/{repo}/commits/{sha}/pulls`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct PullRequestSummary {
    /// The pull request number
    pub number: u64,
}

/// A pull request as returned by `GET /repos/{owner}/{repo}/pulls/{number}`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct PullRequestDetail {
    /// The pull request number
    pub number: u64,
    /// The head branch of the pull request
    pub head: PullRequestHead,
}

/// The head reference of a pull request.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct PullRequestHead {
    /// SHA of the latest commit on the pull request branch
    pub sha: String,
}

/// A single check run.
///
/// Re-running a check creates a new check run, usually inside a new check suite, so
/// several runs with the same name can exist for one commit.
///
/// # Examples
///
/// ```rust
/// use github_client::models::{CheckRun, CheckSuiteRef};
///
/// let run = CheckRun {
///     name: "build".to_string(),
///     conclusion: Some("success".to_string()),
///     check_suite: CheckSuiteRef { id: 5 },
/// };
/// assert!(run.is_success());
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct CheckRun {
    /// The name of the check
    pub name: String,
    /// The final conclusion, `None` while the run is still queued or in progress
    #[serde(default)]
    pub conclusion: Option<String>,
    /// The check suite the run belongs to
    pub check_suite: CheckSuiteRef,
}

impl CheckRun {
    /// Returns `true` if the run concluded with exactly `success`.
    ///
    /// `neutral` and `skipped` conclusions do not count as success.
    pub fn is_success(&self) -> bool {
        self.conclusion.as_deref() == Some("success")
    }

    /// The id of the check suite this run belongs to.
    pub fn suite_id(&self) -> u64 {
        self.check_suite.id
    }
}

/// Reference to the check suite a check run belongs to.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct CheckSuiteRef {
    /// The check suite id. Larger ids belong to more recent suites.
    pub id: u64,
}

/// The envelope returned by `GET /repos/{owner}/{repo}/commits/{ref}/check-runs`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CheckRunList {
    /// Total number of check runs for the ref
    #[serde(default)]
    pub total_count: u64,
    /// The check runs in this page
    #[serde(default)]
    pub check_runs: Vec<CheckRun>,
}

/// A pull request review as returned by `GET /repos/{owner}/{repo}/pulls/{number}/reviews`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Review {
    /// The reviewer, `None` for reviews left by deleted accounts
    #[serde(default)]
    pub user: Option<User>,
    /// The review state, e.g. `APPROVED`, `CHANGES_REQUESTED` or `COMMENTED`
    pub state: String,
}

impl Review {
    /// Returns `true` if this review is an approval.
    pub fn is_approval(&self) -> bool {
        self.state == "APPROVED"
    }
}
