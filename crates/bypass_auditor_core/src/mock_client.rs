//! In-memory `PolicyQueryClient` used by the unit tests of this crate.

use async_trait::async_trait;
use github_client::{
    CheckRun, CheckSuiteRef, CommitDetail, Error as GitHubError, PolicyQueryClient,
    PullRequestDetail, PullRequestHead, PullRequestParameters, PullRequestSummary,
    RequiredStatusChecksParameters, Review, Rule, StatusCheck, User,
};
use tokio::sync::Mutex;

/// Serves canned responses and records every query it receives.
pub struct MockPolicyClient {
    pub rules: Vec<Rule>,
    pub commit: CommitDetail,
    pub pulls: Vec<PullRequestSummary>,
    pub head_sha: String,
    pub check_runs: Vec<CheckRun>,
    pub reviews: Vec<Review>,
    /// Name of the query that should fail with an API error.
    pub fail_on: Option<&'static str>,
    pub calls: Mutex<Vec<String>>,
}

impl MockPolicyClient {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            commit: commit_by("test-user"),
            pulls: vec![PullRequestSummary { number: 123 }],
            head_sha: "latest-sha".to_string(),
            check_runs: Vec::new(),
            reviews: Vec::new(),
            fail_on: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub async fn calls(&self) -> Vec<String> {
        self.calls.lock().await.clone()
    }

    async fn record(&self, call: String, name: &str) -> Result<(), GitHubError> {
        self.calls.lock().await.push(call);
        if self.fail_on == Some(name) {
            return Err(GitHubError::ApiError("Something went wrong".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl PolicyQueryClient for MockPolicyClient {
    async fn get_branch_rules(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<Vec<Rule>, GitHubError> {
        self.record(
            format!("rules {owner}/{repo}@{branch}"),
            "get_branch_rules",
        )
        .await?;
        Ok(self.rules.clone())
    }

    async fn get_commit(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
    ) -> Result<CommitDetail, GitHubError> {
        self.record(format!("commit {owner}/{repo}@{sha}"), "get_commit")
            .await?;
        Ok(self.commit.clone())
    }

    async fn list_pull_requests_for_commit(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
    ) -> Result<Vec<PullRequestSummary>, GitHubError> {
        self.record(
            format!("pulls {owner}/{repo}@{sha}"),
            "list_pull_requests_for_commit",
        )
        .await?;
        Ok(self.pulls.clone())
    }

    async fn get_pull_request(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<PullRequestDetail, GitHubError> {
        self.record(format!("pull {owner}/{repo}#{number}"), "get_pull_request")
            .await?;
        Ok(PullRequestDetail {
            number,
            head: PullRequestHead {
                sha: self.head_sha.clone(),
            },
        })
    }

    async fn list_check_runs_for_ref(
        &self,
        owner: &str,
        repo: &str,
        git_ref: &str,
    ) -> Result<Vec<CheckRun>, GitHubError> {
        self.record(
            format!("check-runs {owner}/{repo}@{git_ref}"),
            "list_check_runs_for_ref",
        )
        .await?;
        Ok(self.check_runs.clone())
    }

    async fn list_pull_request_reviews(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<Vec<Review>, GitHubError> {
        self.record(
            format!("reviews {owner}/{repo}#{number}"),
            "list_pull_request_reviews",
        )
        .await?;
        Ok(self.reviews.clone())
    }
}

pub fn commit_by(login: &str) -> CommitDetail {
    CommitDetail {
        sha: "test-sha".to_string(),
        author: Some(User {
            id: 1,
            login: login.to_string(),
        }),
        committer: None,
    }
}

pub fn check_run(name: &str, conclusion: Option<&str>, suite_id: u64) -> CheckRun {
    CheckRun {
        name: name.to_string(),
        conclusion: conclusion.map(str::to_string),
        check_suite: CheckSuiteRef { id: suite_id },
    }
}

pub fn review(state: &str) -> Review {
    Review {
        user: None,
        state: state.to_string(),
    }
}

pub fn status_checks_rule(contexts: &[&str]) -> Rule {
    Rule::RequiredStatusChecks {
        parameters: RequiredStatusChecksParameters {
            required_status_checks: contexts
                .iter()
                .map(|c| StatusCheck {
                    context: c.to_string(),
                })
                .collect(),
        },
    }
}

pub fn pull_request_rule(count: u32) -> Rule {
    Rule::PullRequest {
        parameters: PullRequestParameters {
            required_approving_review_count: Some(count),
        },
    }
}
