//! Branch rule domain types.
//!
//! This module contains the types returned by GitHub's "get rules for a branch"
//! endpoint. That endpoint flattens every active ruleset that applies to the branch
//! into a single list of rules, so the same rule type can appear more than once.
//!
//! See: https://docs.github.com/en/rest/repos/rules#get-rules-for-a-branch

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "ruleset_tests.rs"]
mod tests;

/// A rule that applies to a branch.
///
/// Only the rule types that take part in merge auditing are modelled. Every other
/// rule type (creation, deletion, merge queue, code scanning and so on) deserializes
/// to [`Rule::Other`].
///
/// # Examples
///
/// ```rust
/// use github_client::{Rule, RequiredStatusChecksParameters, StatusCheck};
///
/// let rule = Rule::RequiredStatusChecks {
///     parameters: RequiredStatusChecksParameters {
///         required_status_checks: vec![StatusCheck {
///             context: "build".to_string(),
///         }],
///     },
/// };
/// assert_eq!(rule.status_check_contexts(), vec!["build"]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Rule {
    /// Pull request requirements
    PullRequest {
        /// Pull request parameters
        parameters: PullRequestParameters,
    },

    /// Required status checks
    RequiredStatusChecks {
        /// Required status check parameters
        parameters: RequiredStatusChecksParameters,
    },

    /// Any rule type that is not evaluated by the auditor
    #[serde(other)]
    Other,
}

impl Rule {
    /// Returns the status check contexts declared by a `required_status_checks` rule.
    ///
    /// Returns an empty list for any other rule type.
    pub fn status_check_contexts(&self) -> Vec<&str> {
        match self {
            Rule::RequiredStatusChecks { parameters } => parameters
                .required_status_checks
                .iter()
                .map(|c| c.context.as_str())
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Returns the required approving review count of a `pull_request` rule.
    ///
    /// Returns `None` for any other rule type. A `pull_request` rule without a count
    /// is reported as zero.
    pub fn required_approving_review_count(&self) -> Option<u32> {
        match self {
            Rule::PullRequest { parameters } => {
                Some(parameters.required_approving_review_count.unwrap_or(0))
            }
            _ => None,
        }
    }
}

/// Parameters for pull request rules.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PullRequestParameters {
    /// Required approving review count
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_approving_review_count: Option<u32>,
}

/// Parameters for required status checks.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RequiredStatusChecksParameters {
    /// Required status checks
    #[serde(default)]
    pub required_status_checks: Vec<StatusCheck>,
}

/// A required status check.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusCheck {
    /// Status check context, matched against check run names
    pub context: String,
}
