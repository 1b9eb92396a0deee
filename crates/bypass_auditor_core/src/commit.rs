//! Resolution of a commit to its author and originating pull request.

use github_client::{CommitDetail, PolicyQueryClient};
use tracing::{info, warn};

use crate::{AuditResult, AuditTarget};

#[cfg(test)]
#[path = "commit_tests.rs"]
mod tests;

/// Actor reported when neither the author nor the committer maps to a GitHub account.
pub const UNKNOWN_ACTOR: &str = "unknown";

/// The audited commit and the login of the account that authored it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRef {
    /// The commit SHA as requested.
    pub sha: String,
    /// Author login, committer login, or [`UNKNOWN_ACTOR`]. Never empty.
    pub author_login: String,
}

/// The pull request a commit was merged through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestLink {
    /// The pull request number.
    pub number: u64,
    /// SHA of the pull request's current head commit.
    pub head_sha: String,
}

/// Result of resolving a commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCommit {
    pub commit: CommitRef,
    /// `None` when no pull request is associated with the commit.
    pub pull_request: Option<PullRequestLink>,
}

/// Picks the login to report for a commit.
///
/// Falls back from the author's account to the committer's account and finally to
/// [`UNKNOWN_ACTOR`]. Empty logins are skipped.
pub fn resolve_author(commit: &CommitDetail) -> String {
    [&commit.author, &commit.committer]
        .into_iter()
        .flatten()
        .map(|user| user.login.trim())
        .find(|login| !login.is_empty())
        .unwrap_or(UNKNOWN_ACTOR)
        .to_string()
}

/// Resolves the author of the target commit and the pull request it came from.
///
/// When GitHub associates several pull requests with the commit, the first one in
/// the returned list is used. Its head SHA is looked up with a separate request.
///
/// # Errors
///
/// Returns `AuditError::Transport` if any of the lookups fails.
pub async fn resolve_commit(
    client: &dyn PolicyQueryClient,
    target: &AuditTarget,
) -> AuditResult<ResolvedCommit> {
    info!(sha = %target.sha, "Fetching commit details...");
    let detail = client
        .get_commit(&target.owner, &target.repo, &target.sha)
        .await?;
    let author_login = resolve_author(&detail);
    info!(commit_actor = %author_login, "Resolved commit actor");

    let commit = CommitRef {
        sha: target.sha.clone(),
        author_login,
    };

    info!("Fetching PR associated with the commit...");
    let pulls = client
        .list_pull_requests_for_commit(&target.owner, &target.repo, &target.sha)
        .await?;

    let Some(first) = pulls.first() else {
        warn!(sha = %target.sha, "No PR associated with this push.");
        return Ok(ResolvedCommit {
            commit,
            pull_request: None,
        });
    };

    if pulls.len() > 1 {
        info!(
            pull_request_count = pulls.len(),
            selected = first.number,
            "Commit is associated with several pull requests, using the first one"
        );
    }
    info!(pull_request = first.number, "PR Number: {}", first.number);

    info!("Fetching the latest commit SHA from the PR...");
    let detail = client
        .get_pull_request(&target.owner, &target.repo, first.number)
        .await?;
    info!(head_sha = %detail.head.sha, "Latest SHA from the PR: {}", detail.head.sha);

    Ok(ResolvedCommit {
        commit,
        pull_request: Some(PullRequestLink {
            number: first.number,
            head_sha: detail.head.sha,
        }),
    })
}
