//! Merge bypass auditor command-line tool.
//!
//! Resolves the commit to audit from the command line, an optional configuration
//! file and the GitHub Actions environment, runs the audit and reports the verdict
//! as step outputs and workflow annotations.

pub mod args;
pub mod audit_cmd;
pub mod config;
pub mod errors;
pub mod outputs;
