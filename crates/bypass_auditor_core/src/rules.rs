//! Extraction of the merge requirements declared by a branch's rules.

use std::collections::HashSet;

use github_client::Rule;

#[cfg(test)]
#[path = "rules_tests.rs"]
mod tests;

/// The merge requirements the auditor checks a commit against.
///
/// An empty `required_checks` list and a zero `required_approving_reviews` mean
/// "no requirement", and the corresponding gate is skipped rather than evaluated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProtectionRequirements {
    /// Names of the required status checks, each listed once in first-seen order.
    pub required_checks: Vec<String>,
    /// Minimum number of approving reviews.
    pub required_approving_reviews: u32,
}

impl ProtectionRequirements {
    /// Returns `true` if at least one status check is required.
    pub fn has_required_checks(&self) -> bool {
        !self.required_checks.is_empty()
    }

    /// Returns `true` if at least one approving review is required.
    pub fn requires_reviews(&self) -> bool {
        self.required_approving_reviews > 0
    }
}

/// Collapses the rules that apply to a branch into [`ProtectionRequirements`].
///
/// Status check contexts from every `required_status_checks` rule are merged into
/// one list. The review count comes from the first `pull_request` rule, or zero if
/// there is none. All other rule types are ignored.
pub fn extract_requirements(rules: &[Rule]) -> ProtectionRequirements {
    let mut seen = HashSet::new();
    let required_checks = rules
        .iter()
        .flat_map(Rule::status_check_contexts)
        .filter(|context| seen.insert(*context))
        .map(str::to_string)
        .collect();

    let required_approving_reviews = rules
        .iter()
        .find_map(Rule::required_approving_review_count)
        .unwrap_or(0);

    ProtectionRequirements {
        required_checks,
        required_approving_reviews,
    }
}
