//! The audit command.
//!
//! Runs one audit for the resolved settings, reports the verdict to the workflow and
//! decides the process exit code.

use std::{path::Path, sync::Arc};

use bypass_auditor_core::{BypassVerdict, MergeAuditor};
use github_client::{create_token_client, GitHubClient};
use secrecy::ExposeSecret;
use tracing::{info, instrument, warn};

use crate::{
    args::OutputFormat,
    config::AuditSettings,
    errors::Error,
    outputs::{verdict_annotations, write_outputs},
};

#[cfg(test)]
#[path = "audit_cmd_tests.rs"]
mod tests;

/// Exit code for a clean verdict, or a bypass that only warns.
pub const EXIT_OK: i32 = 0;

/// Exit code for a detected bypass when bypasses fail the run.
pub const EXIT_BYPASS: i32 = 1;

/// Exit code for configuration errors and failed GitHub queries.
pub const EXIT_ERROR: i32 = 2;

/// Audits the configured commit and reports the verdict.
///
/// Annotations and, for `--format json`, the serialized verdict are printed to
/// stdout. The step outputs go to `output_file` when given.
///
/// # Errors
///
/// Returns an error if the client cannot be created, any GitHub query fails, or
/// the outputs cannot be written. No outputs are written in that case.
#[instrument(skip(settings, output_file), fields(owner = %settings.target.owner, repo = %settings.target.repo, sha = %settings.target.sha))]
pub async fn execute(settings: &AuditSettings, output_file: Option<&Path>) -> Result<i32, Error> {
    let octocrab = create_token_client(
        settings.token.expose_secret(),
        settings.api_url.as_deref(),
    )?;
    let auditor = MergeAuditor::new(Arc::new(GitHubClient::new(octocrab)));

    let verdict = auditor.audit(&settings.target).await?;

    for line in verdict_annotations(&verdict, settings.fail_on_bypass) {
        println!("{}", line);
    }

    write_outputs(&verdict, output_file)?;

    if settings.format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&verdict)?);
    }

    let code = exit_code(&verdict, settings.fail_on_bypass);
    if code == EXIT_BYPASS {
        warn!(actor = %verdict.actor, "Failing the run because a merge bypass was detected");
    } else {
        info!(detected = verdict.detected, "Audit finished");
    }
    Ok(code)
}

/// The exit code for a verdict.
pub fn exit_code(verdict: &BypassVerdict, fail_on_bypass: bool) -> i32 {
    if verdict.detected && fail_on_bypass {
        EXIT_BYPASS
    } else {
        EXIT_OK
    }
}
