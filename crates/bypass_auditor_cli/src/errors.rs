use std::io;

use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur in the merge bypass auditor CLI.
///
/// Every variant ends the run without a verdict. A detected bypass is not an error.
#[derive(Error, Debug)]
pub enum Error {
    /// The audit could not be completed.
    #[error(transparent)]
    Audit(#[from] bypass_auditor_core::AuditError),

    /// Configuration error occurred while loading or parsing configuration.
    ///
    /// Returned when the configuration file is missing or malformed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The GitHub client could not be created.
    #[error("GitHub client error: {0}")]
    GitHub(#[from] github_client::Error),

    /// Invalid command-line arguments or environment were provided.
    ///
    /// Returned when a required input such as the token or the commit SHA cannot be
    /// found anywhere.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Failed to write the step outputs.
    #[error("Failed to write outputs: {0}")]
    WriteOutputs(io::Error),

    /// Failed to serialize the verdict as JSON.
    #[error("Failed to serialize the verdict: {0}")]
    Serialize(#[from] serde_json::Error),
}
