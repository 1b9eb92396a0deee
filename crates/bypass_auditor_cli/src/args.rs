//! Command-line arguments.
//!
//! Every argument can also be supplied through the environment. The `INPUT_*`
//! variables are the ones GitHub Actions sets for the inputs of an action step.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Audits a commit on a protected branch for merge policy bypasses
#[derive(Parser, Debug, Default)]
#[command(name = "merge-bypass-auditor", version)]
#[command(
    about = "Check whether a commit on a protected branch bypassed the branch's merge rules",
    long_about = None
)]
pub struct Cli {
    /// GitHub token used for the API queries
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Repository owner, defaults to the owner part of GITHUB_REPOSITORY
    #[arg(long, env = "INPUT_OWNER")]
    pub owner: Option<String>,

    /// Repository name, defaults to the name part of GITHUB_REPOSITORY
    #[arg(long, env = "INPUT_REPO")]
    pub repo: Option<String>,

    /// Commit to audit, defaults to GITHUB_SHA
    #[arg(long, env = "INPUT_SHA")]
    pub sha: Option<String>,

    /// Protected branch whose rules apply to the commit
    #[arg(long, env = "INPUT_BRANCH")]
    pub branch: Option<String>,

    /// Exit with a failure status when a bypass is detected (true or false)
    #[arg(
        long,
        env = "INPUT_FAIL_ON_BYPASS",
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub fail_on_bypass: Option<String>,

    /// Path to a TOML configuration file
    #[arg(long, env = "MERGE_AUDITOR_CONFIG")]
    pub config: Option<PathBuf>,

    /// GitHub API base URL, for GitHub Enterprise Server
    #[arg(long, env = "GITHUB_API_URL")]
    pub api_url: Option<String>,

    /// Output format for the verdict
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// How the verdict is printed in addition to the step outputs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Workflow annotations only
    #[default]
    Text,
    /// Workflow annotations followed by the verdict as JSON
    Json,
}
