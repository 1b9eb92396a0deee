//! Crate for querying the GitHub REST API on behalf of the merge auditor.
//!
//! This crate provides the read-only queries needed to decide whether a commit on a
//! protected branch went through the branch's merge policy: the rules that apply to
//! the branch, the commit itself, its pull requests, their check runs and reviews.
//!
//! The queries are exposed through the [`PolicyQueryClient`] trait so that callers
//! can substitute an in-memory implementation in tests. [`GitHubClient`] is the
//! `octocrab`-backed implementation.

use async_trait::async_trait;
use octocrab::{
    service::middleware::retry::RetryConfig, Octocrab, Result as OctocrabResult,
};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::{debug, error, info, instrument};

pub mod errors;
pub use errors::Error;

pub mod models;
pub use models::{
    CheckRun, CheckRunList, CheckSuiteRef, CommitDetail, PullRequestDetail, PullRequestHead,
    PullRequestSummary, Review,
};

pub mod ruleset;
pub use ruleset::{PullRequestParameters, RequiredStatusChecksParameters, Rule, StatusCheck};

pub mod user;
pub use user::User;

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

/// Largest page size GitHub accepts for list endpoints.
const PAGE_SIZE: u8 = 100;

/// Read-only queries against a source control platform.
///
/// Every method performs its lookup and returns; nothing is cached and nothing is
/// retried. A failure means the caller cannot trust any verdict it was building.
#[async_trait]
pub trait PolicyQueryClient: Send + Sync {
    /// Gets every active rule that applies to a branch.
    ///
    /// # Arguments
    ///
    /// * `owner` - The owner of the repository (user or organization name).
    /// * `repo` - The name of the repository.
    /// * `branch` - The branch name, without the `refs/heads/` prefix.
    ///
    /// # Errors
    /// Returns an `Error` if the API call fails or the response cannot be parsed.
    async fn get_branch_rules(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<Vec<Rule>, Error>;

    /// Gets a single commit, including the GitHub accounts linked to its author and committer.
    async fn get_commit(&self, owner: &str, repo: &str, sha: &str) -> Result<CommitDetail, Error>;

    /// Lists the pull requests associated with a commit, in the order GitHub returns them.
    async fn list_pull_requests_for_commit(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
    ) -> Result<Vec<PullRequestSummary>, Error>;

    /// Gets a pull request, including the SHA of its current head commit.
    async fn get_pull_request(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<PullRequestDetail, Error>;

    /// Lists every check run reported for a git reference.
    ///
    /// The result contains all runs, including superseded re-runs of the same check.
    async fn list_check_runs_for_ref(
        &self,
        owner: &str,
        repo: &str,
        git_ref: &str,
    ) -> Result<Vec<CheckRun>, Error>;

    /// Lists every review submitted on a pull request.
    async fn list_pull_request_reviews(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<Vec<Review>, Error>;
}

/// Query parameters for paginated list endpoints.
#[derive(Debug, Serialize)]
struct PageParameters {
    per_page: u8,
    page: u32,
}

impl PageParameters {
    fn page(page: u32) -> Self {
        Self {
            per_page: PAGE_SIZE,
            page,
        }
    }
}

/// A client for querying the GitHub API.
#[derive(Debug)]
pub struct GitHubClient {
    client: Octocrab,
}

impl GitHubClient {
    /// Creates a new `GitHubClient` from an already configured `Octocrab` instance.
    ///
    /// Use [`create_token_client`] to build the `Octocrab` instance from a token.
    pub fn new(client: Octocrab) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PolicyQueryClient for GitHubClient {
    #[instrument(skip(self), fields(owner = %owner, repo = %repo, branch = %branch))]
    async fn get_branch_rules(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<Vec<Rule>, Error> {
        let path = format!("/repos/{}/{}/rules/branches/{}", owner, repo, branch);

        debug!("Making API call to: {}", path);
        let response: OctocrabResult<Vec<Rule>> = self.client.get(path, None::<&()>).await;
        match response {
            Ok(rules) => {
                info!(rule_count = rules.len(), "Retrieved branch rules");
                Ok(rules)
            }
            Err(e) => Err(map_octocrab_error(
                "Failed to get branch rules",
                &format!("rules for branch {}", branch),
                e,
            )),
        }
    }

    #[instrument(skip(self), fields(owner = %owner, repo = %repo, sha = %sha))]
    async fn get_commit(&self, owner: &str, repo: &str, sha: &str) -> Result<CommitDetail, Error> {
        let path = format!("/repos/{}/{}/commits/{}", owner, repo, sha);

        debug!("Making API call to: {}", path);
        let response: OctocrabResult<CommitDetail> = self.client.get(path, None::<&()>).await;
        response.map_err(|e| {
            map_octocrab_error("Failed to get commit", &format!("commit {}", sha), e)
        })
    }

    #[instrument(skip(self), fields(owner = %owner, repo = %repo, sha = %sha))]
    async fn list_pull_requests_for_commit(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
    ) -> Result<Vec<PullRequestSummary>, Error> {
        let path = format!("/repos/{}/{}/commits/{}/pulls", owner, repo, sha);

        debug!("Making API call to: {}", path);
        let response: OctocrabResult<Vec<PullRequestSummary>> =
            self.client.get(path, None::<&()>).await;
        match response {
            Ok(pulls) => {
                info!(
                    pull_request_count = pulls.len(),
                    "Retrieved pull requests associated with commit"
                );
                Ok(pulls)
            }
            Err(e) => Err(map_octocrab_error(
                "Failed to list pull requests for commit",
                &format!("pull requests for commit {}", sha),
                e,
            )),
        }
    }

    #[instrument(skip(self), fields(owner = %owner, repo = %repo, number = number))]
    async fn get_pull_request(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<PullRequestDetail, Error> {
        let path = format!("/repos/{}/{}/pulls/{}", owner, repo, number);

        debug!("Making API call to: {}", path);
        let response: OctocrabResult<PullRequestDetail> = self.client.get(path, None::<&()>).await;
        response.map_err(|e| {
            map_octocrab_error(
                "Failed to get pull request",
                &format!("pull request #{}", number),
                e,
            )
        })
    }

    #[instrument(skip(self), fields(owner = %owner, repo = %repo, git_ref = %git_ref))]
    async fn list_check_runs_for_ref(
        &self,
        owner: &str,
        repo: &str,
        git_ref: &str,
    ) -> Result<Vec<CheckRun>, Error> {
        let path = format!("/repos/{}/{}/commits/{}/check-runs", owner, repo, git_ref);

        let mut check_runs = Vec::new();
        let mut page = 1;
        loop {
            debug!(page = page, "Making API call to: {}", path);
            let response: OctocrabResult<CheckRunList> = self
                .client
                .get(&path, Some(&PageParameters::page(page)))
                .await;
            let list = response.map_err(|e| {
                map_octocrab_error(
                    "Failed to list check runs",
                    &format!("check runs for {}", git_ref),
                    e,
                )
            })?;

            let received = list.check_runs.len();
            check_runs.extend(list.check_runs);
            if received == 0 || check_runs.len() as u64 >= list.total_count {
                break;
            }
            page += 1;
        }

        info!(
            check_run_count = check_runs.len(),
            "Retrieved check runs for ref"
        );
        Ok(check_runs)
    }

    #[instrument(skip(self), fields(owner = %owner, repo = %repo, number = number))]
    async fn list_pull_request_reviews(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<Vec<Review>, Error> {
        let path = format!("/repos/{}/{}/pulls/{}/reviews", owner, repo, number);

        let mut reviews = Vec::new();
        let mut page = 1;
        loop {
            debug!(page = page, "Making API call to: {}", path);
            let response: OctocrabResult<Vec<Review>> = self
                .client
                .get(&path, Some(&PageParameters::page(page)))
                .await;
            let batch = response.map_err(|e| {
                map_octocrab_error(
                    "Failed to list pull request reviews",
                    &format!("reviews for pull request #{}", number),
                    e,
                )
            })?;

            let received = batch.len();
            reviews.extend(batch);
            if received < PAGE_SIZE as usize {
                break;
            }
            page += 1;
        }

        info!(review_count = reviews.len(), "Retrieved pull request reviews");
        Ok(reviews)
    }
}

/// Creates an `Octocrab` client authenticated with a personal access token or an
/// installation token, such as the `GITHUB_TOKEN` of a workflow run.
///
/// # Arguments
///
/// * `token` - The token to authenticate with.
/// * `api_base_url` - Optional API base URL, used for GitHub Enterprise Server.
///   `None` targets `https://api.github.com`.
///
/// # Errors
///
/// Returns an `Error::AuthError` if the token is empty, the base URL cannot be
/// parsed, or the client cannot be built.
///
/// # Example
///
/// ```rust,no_run
/// use github_client::{create_token_client, GitHubClient, Error};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Error> {
///     let octocrab = create_token_client("ghp_example", None)?;
///     let client = GitHubClient::new(octocrab);
///
///     // Use `client` to perform API queries
///     Ok(())
/// }
/// ```
#[instrument(skip(token))]
pub fn create_token_client(token: &str, api_base_url: Option<&str>) -> Result<Octocrab, Error> {
    let token = SecretString::from(token.to_string());
    if token.expose_secret().trim().is_empty() {
        return Err(Error::AuthError("No GitHub token was provided.".to_string()));
    }

    // A failed query fails the audit, so octocrab's default retries are disabled.
    let mut builder = Octocrab::builder()
        .add_retry_config(RetryConfig::None)
        .personal_token(token.expose_secret().to_string());
    if let Some(url) = api_base_url {
        builder = builder.base_uri(url).map_err(|e| {
            error!(api_base_url = url, error = %e, "Failed to parse the API base URL");
            Error::AuthError(format!("Invalid GitHub API URL '{}': {}", url, e))
        })?;
    }

    builder.build().map_err(|e| {
        error!(error = ?e, "Failed to build Octocrab client with token credentials");
        Error::AuthError(format!("Failed to build the GitHub client: {}", e))
    })
}

/// Logs an octocrab failure and translates it into the crate's [`Error`] type.
///
/// `resource` names what was being fetched and ends up in `Error::NotFound`.
fn map_octocrab_error(message: &str, resource: &str, e: octocrab::Error) -> Error {
    let mapped = match &e {
        octocrab::Error::GitHub { source, .. } => {
            let status = source.status_code;
            let rate_limited = (status == http::StatusCode::FORBIDDEN
                || status == http::StatusCode::TOO_MANY_REQUESTS)
                && source.message.to_lowercase().contains("rate limit");

            if status == http::StatusCode::NOT_FOUND {
                Error::NotFound(resource.to_string())
            } else if rate_limited {
                Error::RateLimitExceeded
            } else {
                Error::ApiError(format!("{} ({})", source.message, status))
            }
        }
        octocrab::Error::Serde { .. } | octocrab::Error::Json { .. } => Error::InvalidResponse,
        other => Error::ApiError(other.to_string()),
    };

    log_octocrab_error(message, e);
    mapped
}

fn log_octocrab_error(message: &str, e: octocrab::Error) {
    match e {
        octocrab::Error::GitHub { source, backtrace } => {
            let err = source;
            error!(
                error_message = err.message,
                status_code = err.status_code.as_u16(),
                backtrace = backtrace.to_string(),
                "{}. Received an error from GitHub",
                message
            )
        }
        octocrab::Error::UriParse { source, backtrace } => error!(
            error_message = source.to_string(),
            backtrace = backtrace.to_string(),
            "{}. Failed to parse URI.",
            message
        ),
        octocrab::Error::Uri { source, backtrace } => error!(
            error_message = source.to_string(),
            backtrace = backtrace.to_string(),
            "{}, Failed to parse URI.",
            message
        ),
        octocrab::Error::InvalidHeaderValue { source, backtrace } => error!(
            error_message = source.to_string(),
            backtrace = backtrace.to_string(),
            "{}. One of the header values was invalid.",
            message
        ),
        octocrab::Error::InvalidUtf8 { source, backtrace } => error!(
            error_message = source.to_string(),
            backtrace = backtrace.to_string(),
            "{}. The message wasn't valid UTF-8.",
            message,
        ),
        _ => error!(error_message = e.to_string(), message),
    };
}
