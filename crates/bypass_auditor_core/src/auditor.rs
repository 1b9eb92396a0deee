//! The audit pipeline.
//!
//! This module provides the [`MergeAuditor`] component that runs the stages of a
//! merge audit in order and produces a [`BypassVerdict`].

use std::sync::Arc;

use github_client::PolicyQueryClient;
use tracing::{info, instrument, warn};

use crate::{
    compose_verdict, evaluate_reviews, extract_requirements, reconcile_required_checks,
    resolve_commit, AuditError, AuditResult, BypassVerdict, CheckEvaluation, ReviewEvaluation,
    SkipReason,
};

#[cfg(test)]
#[path = "auditor_tests.rs"]
mod tests;

/// Identifies the commit to audit and the branch whose rules apply to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditTarget {
    /// Repository owner (user or organization name)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Protected branch the commit landed on
    pub branch: String,
    /// SHA of the commit to audit
    pub sha: String,
}

impl AuditTarget {
    /// Creates a new audit target.
    ///
    /// # Errors
    ///
    /// Returns `AuditError::InvalidTarget` if any part is empty.
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        branch: impl Into<String>,
        sha: impl Into<String>,
    ) -> AuditResult<Self> {
        let target = Self {
            owner: owner.into().trim().to_string(),
            repo: repo.into().trim().to_string(),
            branch: branch.into().trim().to_string(),
            sha: sha.into().trim().to_string(),
        };

        for (field, value) in [
            ("owner", &target.owner),
            ("repo", &target.repo),
            ("branch", &target.branch),
            ("sha", &target.sha),
        ] {
            if value.is_empty() {
                return Err(AuditError::InvalidTarget(format!("{} is empty", field)));
            }
        }

        Ok(target)
    }
}

/// Audits commits on protected branches for merge policy bypasses.
///
/// Each call to [`MergeAuditor::audit`] is independent. Lookups are issued one at a
/// time because each depends on the result of the previous one, and the first
/// failed lookup aborts the audit without a verdict.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use bypass_auditor_core::{AuditTarget, MergeAuditor};
/// use github_client::{create_token_client, GitHubClient};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = GitHubClient::new(create_token_client("ghp_example", None)?);
/// let auditor = MergeAuditor::new(Arc::new(client));
///
/// let target = AuditTarget::new("my-org", "my-repo", "main", "6dcb09b5b5")?;
/// let verdict = auditor.audit(&target).await?;
/// println!("Bypass detected: {}", verdict.detected);
/// # Ok(())
/// # }
/// ```
pub struct MergeAuditor {
    /// Query client for the source control platform
    client: Arc<dyn PolicyQueryClient>,
}

impl MergeAuditor {
    /// Creates a new MergeAuditor.
    pub fn new(client: Arc<dyn PolicyQueryClient>) -> Self {
        Self { client }
    }

    /// Audits a single commit.
    ///
    /// # Behavior
    ///
    /// 1. Fetches the branch rules and extracts the required checks and review count
    /// 2. Resolves the commit's author and its pull request
    /// 3. Evaluates the required checks on the pull request's head commit
    /// 4. Counts the pull request's approving reviews
    /// 5. Combines the gates into a verdict
    ///
    /// Steps 3 and 4 are skipped when the branch does not require them or when the
    /// commit has no pull request.
    ///
    /// # Errors
    ///
    /// Returns `AuditError::Transport` if any lookup fails.
    #[instrument(skip(self), fields(owner = %target.owner, repo = %target.repo, sha = %target.sha))]
    pub async fn audit(&self, target: &AuditTarget) -> AuditResult<BypassVerdict> {
        let client = self.client.as_ref();

        info!(branch = %target.branch, "Fetching branch rules...");
        let rules = client
            .get_branch_rules(&target.owner, &target.repo, &target.branch)
            .await?;
        let requirements = extract_requirements(&rules);

        if requirements.has_required_checks() {
            info!(
                required_checks = ?requirements.required_checks,
                "Required checks for the branch:{}",
                requirements
                    .required_checks
                    .iter()
                    .map(|c| format!("\n -> {}", c))
                    .collect::<String>()
            );
        } else {
            info!("No required checks configured for the branch.");
        }
        info!(
            required_approving_reviews = requirements.required_approving_reviews,
            "Required approving reviews for the branch: {}",
            requirements.required_approving_reviews
        );

        let resolved = resolve_commit(client, target).await?;
        let pull_request = resolved.pull_request.as_ref();

        let checks = match (requirements.has_required_checks(), pull_request) {
            (false, _) => CheckEvaluation::Skipped(SkipReason::NotConfigured),
            (true, None) => {
                info!("Skipping required checks, there is no PR to evaluate them on.");
                CheckEvaluation::Skipped(SkipReason::NoPullRequest)
            }
            (true, Some(pr)) => {
                reconcile_required_checks(
                    client,
                    target,
                    &requirements.required_checks,
                    &pr.head_sha,
                )
                .await?
            }
        };

        let reviews = match (requirements.requires_reviews(), pull_request) {
            (false, _) => {
                info!("No approving reviews required for the branch.");
                ReviewEvaluation::Skipped(SkipReason::NotConfigured)
            }
            (true, None) => {
                info!("Skipping review count, there is no PR to count reviews on.");
                ReviewEvaluation::Skipped(SkipReason::NoPullRequest)
            }
            (true, Some(pr)) => {
                evaluate_reviews(
                    client,
                    target,
                    requirements.required_approving_reviews,
                    pr.number,
                )
                .await?
            }
        };

        let verdict = compose_verdict(
            resolved.commit.author_login,
            pull_request.is_some(),
            &checks,
            &reviews,
        );

        if verdict.detected {
            warn!(
                commit_actor = %verdict.actor,
                commit_from_pr = verdict.from_pull_request,
                violation_count = verdict.violations.len(),
                "Merge bypass detected."
            );
        } else {
            info!(
                commit_actor = %verdict.actor,
                commit_from_pr = verdict.from_pull_request,
                "No merge bypass detected."
            );
        }

        Ok(verdict)
    }
}
