use super::*;
use std::fs;
use tempfile::TempDir;

fn verdict(detected: bool, violations: Vec<Violation>) -> BypassVerdict {
    BypassVerdict {
        detected,
        actor: "test-user".to_string(),
        from_pull_request: !violations.contains(&Violation::NoPullRequest),
        violations,
    }
}

#[test]
fn test_output_pairs() {
    let pairs = output_pairs(&verdict(true, vec![Violation::NoPullRequest]));

    assert_eq!(
        pairs,
        vec![
            ("merge_bypass_detected", "true".to_string()),
            ("commit_actor", "test-user".to_string()),
            ("commit_from_pr", "false".to_string()),
        ]
    );
}

#[test]
fn test_write_outputs_appends_to_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let output_path = temp_dir.path().join("github_output");
    fs::write(&output_path, "existing=value\n").expect("Failed to seed output file");

    write_outputs(&verdict(false, Vec::new()), Some(&output_path)).expect("Failed to write");

    let content = fs::read_to_string(&output_path).expect("Failed to read output file");
    assert_eq!(
        content,
        "existing=value\nmerge_bypass_detected=false\ncommit_actor=test-user\ncommit_from_pr=true\n"
    );
}

#[test]
fn test_write_outputs_reports_unwritable_path() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let output_path = temp_dir.path().join("missing").join("github_output");

    let result = write_outputs(&verdict(false, Vec::new()), Some(&output_path));

    assert!(matches!(result, Err(Error::WriteOutputs(_))));
}

#[test]
fn test_annotation_escapes_message() {
    assert_eq!(
        annotation(AnnotationLevel::Warning, "100% done\nnext"),
        "::warning::100%25 done%0Anext"
    );
}

#[test]
fn test_clean_verdict_has_no_annotations() {
    assert!(verdict_annotations(&verdict(false, Vec::new()), true).is_empty());
}

#[test]
fn test_verdict_annotations_levels() {
    let verdict = verdict(
        true,
        vec![
            Violation::FailedCheck {
                name: "build".to_string(),
                found: true,
                conclusion: Some("failure".to_string()),
            },
            Violation::InsufficientApprovals {
                required: 2,
                approved: 1,
            },
        ],
    );

    let warned = verdict_annotations(&verdict, false);
    let failed = verdict_annotations(&verdict, true);

    assert_eq!(
        warned,
        vec![
            "::error::Required build check did not pass (state: failure).".to_string(),
            "::warning::Insufficient approving reviews (1 of 2 required).".to_string(),
            "::warning::Merge bypass detected! Commit actor: test-user".to_string(),
        ]
    );
    assert_eq!(
        failed.last().map(String::as_str),
        Some("::error::Merge bypass detected! Commit actor: test-user")
    );
}
