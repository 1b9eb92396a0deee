//! Step outputs and workflow annotations for GitHub Actions.
//!
//! Outputs are appended to the file named by `GITHUB_OUTPUT` as `name=value` lines.
//! Annotations are printed to stdout as workflow commands, which the runner turns
//! into warnings and errors on the run summary.
//!
//! When `GITHUB_OUTPUT` is not set, the `name=value` lines also go to stdout, so
//! stdout interleaves annotations with output lines. A run that fails with an error
//! prints only its `::error::` annotation and writes no output lines.
//!
//! See: https://docs.github.com/en/actions/using-workflows/workflow-commands-for-github-actions

use std::{
    fs::OpenOptions,
    io::{self, Write},
    path::Path,
};

use bypass_auditor_core::{BypassVerdict, Violation};

use crate::errors::Error;

#[cfg(test)]
#[path = "outputs_tests.rs"]
mod tests;

/// Severity of a workflow annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationLevel {
    Warning,
    Error,
}

impl AnnotationLevel {
    fn command(self) -> &'static str {
        match self {
            AnnotationLevel::Warning => "warning",
            AnnotationLevel::Error => "error",
        }
    }
}

/// Formats a workflow command annotation, escaping the message.
pub fn annotation(level: AnnotationLevel, message: &str) -> String {
    format!("::{}::{}", level.command(), escape_data(message))
}

/// The annotations describing a verdict.
///
/// Failed checks are reported as errors and other violations as warnings. The
/// closing summary line is an error only when the bypass fails the run.
pub fn verdict_annotations(verdict: &BypassVerdict, fail_on_bypass: bool) -> Vec<String> {
    if !verdict.detected {
        return Vec::new();
    }

    let mut lines: Vec<String> = verdict
        .violations
        .iter()
        .map(|violation| {
            let level = match violation {
                Violation::FailedCheck { .. } => AnnotationLevel::Error,
                _ => AnnotationLevel::Warning,
            };
            annotation(level, &violation.to_string())
        })
        .collect();

    let summary_level = if fail_on_bypass {
        AnnotationLevel::Error
    } else {
        AnnotationLevel::Warning
    };
    lines.push(annotation(
        summary_level,
        &format!("Merge bypass detected! Commit actor: {}", verdict.actor),
    ));
    lines
}

/// The step outputs for a verdict, as `(name, value)` pairs.
pub fn output_pairs(verdict: &BypassVerdict) -> Vec<(&'static str, String)> {
    vec![
        ("merge_bypass_detected", verdict.detected.to_string()),
        ("commit_actor", verdict.actor.clone()),
        ("commit_from_pr", verdict.from_pull_request.to_string()),
    ]
}

/// Writes the step outputs for a verdict.
///
/// Appends to `output_file` when given, otherwise prints to stdout.
///
/// # Errors
///
/// Returns `Error::WriteOutputs` if the output file cannot be opened or written.
pub fn write_outputs(verdict: &BypassVerdict, output_file: Option<&Path>) -> Result<(), Error> {
    match output_file {
        Some(path) => {
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(Error::WriteOutputs)?;
            write_pairs(&mut file, verdict).map_err(Error::WriteOutputs)
        }
        None => write_pairs(&mut io::stdout().lock(), verdict).map_err(Error::WriteOutputs),
    }
}

fn write_pairs(writer: &mut dyn Write, verdict: &BypassVerdict) -> io::Result<()> {
    for (name, value) in output_pairs(verdict) {
        writeln!(writer, "{}={}", name, value)?;
    }
    writer.flush()
}

fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
