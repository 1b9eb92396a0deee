use std::{env, path::PathBuf, process};

use bypass_auditor_cli::{
    args::Cli,
    audit_cmd::{self, EXIT_ERROR},
    config::{AuditSettings, FileConfig},
    errors::Error,
    outputs::{annotation, AnnotationLevel},
};
use clap::Parser;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

async fn run(cli: &Cli) -> Result<i32, Error> {
    let file_config = match &cli.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };

    let settings = AuditSettings::resolve(cli, &file_config, &|name: &str| env::var(name).ok())?;

    let output_file = env::var_os("GITHUB_OUTPUT")
        .filter(|value| !value.is_empty())
        .map(PathBuf::from);

    audit_cmd::execute(&settings, output_file.as_deref()).await
}

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_env("MERGE_AUDITOR_LOG")
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match run(&cli).await {
        Ok(code) => process::exit(code),
        Err(e) => {
            error!("Error: {e}");
            println!("{}", annotation(AnnotationLevel::Error, &e.to_string()));
            process::exit(EXIT_ERROR);
        }
    }
}
