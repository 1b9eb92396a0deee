use super::*;
use secrecy::ExposeSecret;
use serial_test::serial;
use std::collections::HashMap;
use std::path::PathBuf;
use tempfile::TempDir;

fn actions_env() -> HashMap<&'static str, &'static str> {
    HashMap::from([
        ("GITHUB_REPOSITORY", "test-owner/test-repo"),
        ("GITHUB_SHA", "test-sha"),
    ])
}

fn lookup<'a>(env: &'a HashMap<&'static str, &'static str>) -> impl Fn(&str) -> Option<String> + 'a {
    move |name: &str| env.get(name).map(|v| v.to_string())
}

fn cli_with_token() -> Cli {
    Cli {
        token: Some("test-token".to_string()),
        ..Default::default()
    }
}

#[test]
fn test_file_config_load_valid_toml() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("auditor.toml");
    fs::write(
        &config_path,
        "branch = \"release\"\nfail_on_bypass = true\napi_url = \"https://ghe.example.com/api/v3\"\n",
    )
    .expect("Failed to write config");

    let config = FileConfig::load(&config_path).expect("Failed to load config");

    assert_eq!(config.branch.as_deref(), Some("release"));
    assert_eq!(config.fail_on_bypass, Some(true));
    assert_eq!(
        config.api_url.as_deref(),
        Some("https://ghe.example.com/api/v3")
    );
}

#[test]
fn test_file_config_load_empty_file_uses_defaults() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("auditor.toml");
    fs::write(&config_path, "").expect("Failed to write config");

    let config = FileConfig::load(&config_path).expect("Failed to load config");

    assert_eq!(config, FileConfig::default());
}

#[test]
fn test_file_config_load_invalid_toml() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("invalid_config.toml");
    fs::write(&config_path, "invalid = toml = syntax").expect("Failed to write invalid TOML");

    let result = FileConfig::load(&config_path);

    if let Err(Error::Config(msg)) = result {
        assert!(msg.contains("Failed to parse configuration file"));
    } else {
        panic!("Expected Config error");
    }
}

#[test]
fn test_file_config_load_nonexistent_file() {
    let nonexistent_path = PathBuf::from("nonexistent_auditor_config.toml");

    let result = FileConfig::load(&nonexistent_path);

    if let Err(Error::Config(msg)) = result {
        assert!(msg.contains("Configuration file not found"));
    } else {
        panic!("Expected Config error");
    }
}

#[test]
fn test_resolve_uses_actions_environment_defaults() {
    let env = actions_env();

    let settings = AuditSettings::resolve(&cli_with_token(), &FileConfig::default(), &lookup(&env))
        .expect("Failed to resolve settings");

    assert_eq!(settings.target.owner, "test-owner");
    assert_eq!(settings.target.repo, "test-repo");
    assert_eq!(settings.target.sha, "test-sha");
    assert_eq!(settings.target.branch, DEFAULT_BRANCH);
    assert!(!settings.fail_on_bypass);
    assert_eq!(settings.api_url, None);
    assert_eq!(settings.token.expose_secret(), "test-token");
}

#[test]
fn test_resolve_command_line_overrides_environment() {
    let env = actions_env();
    let cli = Cli {
        owner: Some("other-owner".to_string()),
        repo: Some("other-repo".to_string()),
        sha: Some("other-sha".to_string()),
        ..cli_with_token()
    };

    let settings = AuditSettings::resolve(&cli, &FileConfig::default(), &lookup(&env))
        .expect("Failed to resolve settings");

    assert_eq!(settings.target.owner, "other-owner");
    assert_eq!(settings.target.repo, "other-repo");
    assert_eq!(settings.target.sha, "other-sha");
}

#[test]
fn test_resolve_empty_inputs_fall_back() {
    let env = actions_env();
    let cli = Cli {
        owner: Some("".to_string()),
        sha: Some("  ".to_string()),
        fail_on_bypass: Some("".to_string()),
        ..cli_with_token()
    };
    let file = FileConfig {
        fail_on_bypass: Some(true),
        ..Default::default()
    };

    let settings =
        AuditSettings::resolve(&cli, &file, &lookup(&env)).expect("Failed to resolve settings");

    assert_eq!(settings.target.owner, "test-owner");
    assert_eq!(settings.target.sha, "test-sha");
    assert!(settings.fail_on_bypass);
}

#[test]
fn test_resolve_command_line_overrides_file() {
    let env = actions_env();
    let cli = Cli {
        branch: Some("develop".to_string()),
        fail_on_bypass: Some("false".to_string()),
        api_url: Some("https://cli.example.com".to_string()),
        ..cli_with_token()
    };
    let file = FileConfig {
        branch: Some("release".to_string()),
        fail_on_bypass: Some(true),
        api_url: Some("https://file.example.com".to_string()),
    };

    let settings =
        AuditSettings::resolve(&cli, &file, &lookup(&env)).expect("Failed to resolve settings");

    assert_eq!(settings.target.branch, "develop");
    assert!(!settings.fail_on_bypass);
    assert_eq!(settings.api_url.as_deref(), Some("https://cli.example.com"));
}

#[test]
fn test_resolve_file_overrides_defaults() {
    let env = actions_env();
    let file = FileConfig {
        branch: Some("release".to_string()),
        fail_on_bypass: None,
        api_url: Some("https://file.example.com".to_string()),
    };

    let settings = AuditSettings::resolve(&cli_with_token(), &file, &lookup(&env))
        .expect("Failed to resolve settings");

    assert_eq!(settings.target.branch, "release");
    assert_eq!(settings.api_url.as_deref(), Some("https://file.example.com"));
}

#[test]
fn test_resolve_token_from_action_input() {
    let mut env = actions_env();
    env.insert("INPUT_GITHUB_TOKEN", "input-token");

    let settings = AuditSettings::resolve(&Cli::default(), &FileConfig::default(), &lookup(&env))
        .expect("Failed to resolve settings");

    assert_eq!(settings.token.expose_secret(), "input-token");
}

#[test]
fn test_resolve_missing_token() {
    let env = actions_env();

    let result = AuditSettings::resolve(&Cli::default(), &FileConfig::default(), &lookup(&env));

    match result {
        Err(Error::InvalidArguments(msg)) => assert!(msg.contains("No GitHub token")),
        other => panic!("Expected InvalidArguments error, got {other:?}"),
    }
}

#[test]
fn test_resolve_missing_sha() {
    let env = HashMap::from([("GITHUB_REPOSITORY", "test-owner/test-repo")]);

    let result = AuditSettings::resolve(&cli_with_token(), &FileConfig::default(), &lookup(&env));

    match result {
        Err(Error::InvalidArguments(msg)) => assert!(msg.contains("No commit SHA")),
        other => panic!("Expected InvalidArguments error, got {other:?}"),
    }
}

#[test]
fn test_resolve_malformed_repository() {
    let env = HashMap::from([("GITHUB_REPOSITORY", "no-slash"), ("GITHUB_SHA", "sha")]);

    let result = AuditSettings::resolve(&cli_with_token(), &FileConfig::default(), &lookup(&env));

    assert!(matches!(result, Err(Error::InvalidArguments(_))));
}

#[test]
fn test_resolve_invalid_fail_on_bypass() {
    let env = actions_env();
    let cli = Cli {
        fail_on_bypass: Some("sometimes".to_string()),
        ..cli_with_token()
    };

    let result = AuditSettings::resolve(&cli, &FileConfig::default(), &lookup(&env));

    match result {
        Err(Error::InvalidArguments(msg)) => assert!(msg.contains("sometimes")),
        other => panic!("Expected InvalidArguments error, got {other:?}"),
    }
}

#[test]
fn test_parse_bool_accepts_common_spellings() {
    assert!(parse_bool("TRUE").unwrap());
    assert!(parse_bool("yes").unwrap());
    assert!(!parse_bool("False").unwrap());
    assert!(!parse_bool("0").unwrap());
}

#[test]
#[serial]
fn test_resolve_reads_process_environment() {
    std::env::set_var("GITHUB_REPOSITORY", "env-owner/env-repo");
    std::env::set_var("GITHUB_SHA", "env-sha");

    let result = AuditSettings::resolve(&cli_with_token(), &FileConfig::default(), &|name| {
        std::env::var(name).ok()
    });

    std::env::remove_var("GITHUB_REPOSITORY");
    std::env::remove_var("GITHUB_SHA");

    let settings = result.expect("Failed to resolve settings");
    assert_eq!(settings.target.owner, "env-owner");
    assert_eq!(settings.target.repo, "env-repo");
    assert_eq!(settings.target.sha, "env-sha");
}
