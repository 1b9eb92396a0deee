use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that stop an audit before a verdict can be produced.
///
/// A detected bypass is not an error. It is reported through
/// [`BypassVerdict`](crate::BypassVerdict).
#[derive(Error, Debug)]
pub enum AuditError {
    /// The audit target is incomplete, e.g. an empty owner, repository or SHA.
    #[error("Invalid audit target: {0}")]
    InvalidTarget(String),

    /// A lookup against the source control platform failed.
    #[error("GitHub query failed: {0}")]
    Transport(#[from] github_client::Error),
}

/// Result type for audit operations.
pub type AuditResult<T> = Result<T, AuditError>;
