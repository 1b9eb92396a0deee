//! Error types for GitHub client operations.
//!
//! This module defines the error types that can occur when querying the GitHub API
//! through the github_client crate. Every variant is a transport-level failure: the
//! caller is expected to abort whatever evaluation it was running and surface the
//! message, since none of the queries are retried.

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur during GitHub client operations.
///
/// ## Examples
///
/// ```rust,ignore
/// use github_client::Error;
///
/// match client.get_commit("owner", "repo", "abc123").await {
///     Ok(commit) => println!("Commit: {}", commit.sha),
///     Err(Error::NotFound(what)) => eprintln!("Missing: {}", what),
///     Err(Error::RateLimitExceeded) => eprintln!("Rate limit exceeded"),
///     Err(err) => eprintln!("Other error: {}", err),
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A GitHub API request failed.
    ///
    /// Covers non-success status codes that have no more specific variant as well as
    /// network failures. The contained string is the upstream error message.
    #[error("API request failed: {0}")]
    ApiError(String),

    /// Authentication or GitHub client initialization failure.
    ///
    /// This error occurs when:
    /// - The token is missing, invalid or expired
    /// - The API base URL cannot be parsed
    /// - The token lacks the permissions needed to read rules, checks or reviews
    #[error("Failed to authenticate or initialize GitHub client: {0}")]
    AuthError(String),

    /// The GitHub API returned a response in an unexpected format.
    ///
    /// Returned when a payload cannot be deserialized into the expected model.
    #[error("Invalid response format")]
    InvalidResponse,

    /// The requested resource was not found.
    ///
    /// GitHub also answers 404 for private resources the token cannot see, so this
    /// does not necessarily mean the resource does not exist.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// GitHub API rate limit has been exceeded.
    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}
