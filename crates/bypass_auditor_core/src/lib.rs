//! # Bypass Auditor Core
//!
//! This crate decides, for a single commit on a protected branch, whether the
//! branch's merge policy was satisfied or bypassed. It is meant to run after the
//! fact, as a verification step in a CI pipeline.
//!
//! ## Overview
//!
//! An audit runs four stages in order:
//! 1. [`extract_requirements`] turns the branch rules into the set of required
//!    status checks and the required approving review count
//! 2. [`resolve_commit`] finds the commit's author and the pull request it was
//!    merged through
//! 3. [`reconcile_required_checks`] keeps the latest run of every check on the pull
//!    request's head commit and compares it with the required checks
//! 4. [`compose_verdict`] combines the check gate, the review gate and the presence
//!    of a pull request into a [`BypassVerdict`]
//!
//! [`MergeAuditor`] wires the stages together on top of a
//! [`github_client::PolicyQueryClient`].
//!
//! ## Error Handling
//!
//! A detected bypass is a normal result. [`AuditError`] is only returned when the
//! audit cannot complete, for instance when a GitHub lookup fails.

pub mod auditor;
pub mod checks;
pub mod commit;
pub mod errors;
pub mod reviews;
pub mod rules;
pub mod verdict;

#[cfg(test)]
mod mock_client;

pub use auditor::{AuditTarget, MergeAuditor};
pub use checks::{
    evaluate_required_checks, observed_state, reconcile_check_runs, reconcile_required_checks,
    CheckEvaluation, CheckOutcome, MISSING_RUN_STATE, UNCONCLUDED_RUN_STATE,
};
pub use commit::{
    resolve_author, resolve_commit, CommitRef, PullRequestLink, ResolvedCommit, UNKNOWN_ACTOR,
};
pub use errors::{AuditError, AuditResult};
pub use reviews::{count_approvals, evaluate_reviews, ReviewEvaluation};
pub use rules::{extract_requirements, ProtectionRequirements};
pub use verdict::{compose_verdict, BypassVerdict, SkipReason, Violation};
