//! Counting of approving reviews against the required review count.

use github_client::{PolicyQueryClient, Review};
use tracing::{info, warn};

use crate::{AuditResult, AuditTarget, SkipReason};

#[cfg(test)]
#[path = "reviews_tests.rs"]
mod tests;

/// Outcome of the approving review gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewEvaluation {
    /// The gate was not evaluated.
    Skipped(SkipReason),
    /// Approvals were counted.
    Evaluated { required: u32, approved: u32 },
}

impl ReviewEvaluation {
    /// Returns `true` if fewer approvals were found than required.
    ///
    /// A skipped gate is never insufficient.
    pub fn is_insufficient(&self) -> bool {
        match self {
            ReviewEvaluation::Skipped(_) => false,
            ReviewEvaluation::Evaluated { required, approved } => approved < required,
        }
    }
}

/// Counts the reviews in the `APPROVED` state.
///
/// Reviews are not grouped by reviewer: two approvals from the same account count
/// twice.
pub fn count_approvals(reviews: &[Review]) -> u32 {
    reviews.iter().filter(|r| r.is_approval()).count() as u32
}

/// Fetches the reviews of a pull request and compares the approvals with the
/// required count.
///
/// # Errors
///
/// Returns `AuditError::Transport` if the reviews cannot be fetched.
pub async fn evaluate_reviews(
    client: &dyn PolicyQueryClient,
    target: &AuditTarget,
    required: u32,
    pull_request: u64,
) -> AuditResult<ReviewEvaluation> {
    info!(pull_request = pull_request, "Fetching PR reviews...");
    let reviews = client
        .list_pull_request_reviews(&target.owner, &target.repo, pull_request)
        .await?;

    let approved = count_approvals(&reviews);
    let evaluation = ReviewEvaluation::Evaluated { required, approved };
    if evaluation.is_insufficient() {
        warn!(
            required = required,
            approved = approved,
            "Insufficient approving reviews ({} of {} required).",
            approved,
            required
        );
    } else {
        info!(
            required = required,
            approved = approved,
            "Sufficient approving reviews ({} of {} required).",
            approved,
            required
        );
    }
    Ok(evaluation)
}
