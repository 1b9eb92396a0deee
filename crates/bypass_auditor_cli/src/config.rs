//! Configuration management for the merge bypass auditor.
//!
//! Settings are resolved from three layers, highest precedence first:
//! 1. Command-line arguments and their environment variables
//! 2. An optional TOML configuration file
//! 3. The GitHub Actions runner environment (`GITHUB_REPOSITORY`, `GITHUB_SHA`)
//!    and built-in defaults

use std::{fs, path::Path};

use bypass_auditor_core::AuditTarget;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    args::{Cli, OutputFormat},
    errors::Error,
};

/// Branch audited when none is configured.
pub const DEFAULT_BRANCH: &str = "main";

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// Contents of the optional TOML configuration file.
///
/// # Example TOML Configuration
///
/// ```toml
/// branch = "main"
/// fail_on_bypass = true
/// api_url = "https://github.example.com/api/v3"
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileConfig {
    /// Protected branch whose rules apply to audited commits
    #[serde(default)]
    pub branch: Option<String>,

    /// Whether a detected bypass fails the run
    #[serde(default)]
    pub fail_on_bypass: Option<bool>,

    /// GitHub API base URL
    #[serde(default)]
    pub api_url: Option<String>,
}

impl FileConfig {
    /// Loads configuration from a TOML file at the specified path.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the file doesn't exist, can't be read, or contains
    /// invalid TOML.
    pub fn load(path: &Path) -> Result<Self, Error> {
        debug!("Loading configuration from {:?}", path);

        if !path.exists() {
            return Err(Error::Config(format!(
                "Configuration file not found: {:?}",
                path
            )));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read configuration file: {}", e)))?;

        let config: FileConfig = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse configuration file: {}", e)))?;

        Ok(config)
    }
}

/// Fully resolved settings for one audit run.
#[derive(Debug)]
pub struct AuditSettings {
    /// Token used for the GitHub queries
    pub token: SecretString,
    /// The commit to audit
    pub target: AuditTarget,
    /// Whether a detected bypass fails the run
    pub fail_on_bypass: bool,
    /// GitHub API base URL, `None` for github.com
    pub api_url: Option<String>,
    /// How the verdict is printed
    pub format: OutputFormat,
}

impl AuditSettings {
    /// Resolves the settings from the command line, the configuration file and the
    /// environment.
    ///
    /// `env` looks up environment variables. Empty values are treated as unset, since
    /// GitHub Actions passes unset inputs as empty strings.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArguments` if the token, repository or commit SHA
    /// cannot be determined, or if `fail_on_bypass` is not a boolean.
    pub fn resolve(
        cli: &Cli,
        file: &FileConfig,
        env: &dyn Fn(&str) -> Option<String>,
    ) -> Result<Self, Error> {
        let env_value = |name: &str| non_empty(env(name));

        let token = non_empty(cli.token.clone())
            .or_else(|| env_value("INPUT_GITHUB_TOKEN"))
            .ok_or_else(|| {
                Error::InvalidArguments(
                    "No GitHub token was provided. Use --token or set GITHUB_TOKEN.".to_string(),
                )
            })?;

        let (default_owner, default_repo) = match env_value("GITHUB_REPOSITORY") {
            Some(repository) => split_repository(&repository)?,
            None => (None, None),
        };
        let owner = non_empty(cli.owner.clone())
            .or(default_owner)
            .ok_or_else(|| {
                Error::InvalidArguments(
                    "No repository owner was provided. Use --owner or set GITHUB_REPOSITORY."
                        .to_string(),
                )
            })?;
        let repo = non_empty(cli.repo.clone()).or(default_repo).ok_or_else(|| {
            Error::InvalidArguments(
                "No repository name was provided. Use --repo or set GITHUB_REPOSITORY."
                    .to_string(),
            )
        })?;

        let sha = non_empty(cli.sha.clone())
            .or_else(|| env_value("GITHUB_SHA"))
            .ok_or_else(|| {
                Error::InvalidArguments(
                    "No commit SHA was provided. Use --sha or set GITHUB_SHA.".to_string(),
                )
            })?;

        let branch = non_empty(cli.branch.clone())
            .or_else(|| non_empty(file.branch.clone()))
            .unwrap_or_else(|| DEFAULT_BRANCH.to_string());

        let fail_on_bypass = match non_empty(cli.fail_on_bypass.clone()) {
            Some(value) => parse_bool(&value)?,
            None => file.fail_on_bypass.unwrap_or(false),
        };

        let api_url = non_empty(cli.api_url.clone()).or_else(|| non_empty(file.api_url.clone()));

        let target = AuditTarget::new(owner, repo, branch, sha)?;
        info!(
            owner = %target.owner,
            repo = %target.repo,
            branch = %target.branch,
            sha = %target.sha,
            fail_on_bypass = fail_on_bypass,
            "Resolved audit settings"
        );

        Ok(Self {
            token: SecretString::from(token),
            target,
            fail_on_bypass,
            api_url,
            format: cli.format,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Splits `owner/repo` as found in `GITHUB_REPOSITORY`.
fn split_repository(repository: &str) -> Result<(Option<String>, Option<String>), Error> {
    match repository.split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
            Ok((Some(owner.to_string()), Some(repo.to_string())))
        }
        _ => Err(Error::InvalidArguments(format!(
            "GITHUB_REPOSITORY must have the form owner/repo, got '{}'",
            repository
        ))),
    }
}

fn parse_bool(value: &str) -> Result<bool, Error> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(Error::InvalidArguments(format!(
            "fail_on_bypass must be true or false, got '{}'",
            value
        ))),
    }
}
