use repo2pdf::coordinate::parse_repo_url;
use repo2pdf::error::PipelineError;

#[test]
fn three_segment_url_leaves_branch_and_directory_empty() {
    let coordinate = parse_repo_url("https://github.com/apache/airflow").expect("should parse");

    assert_eq!(coordinate.provider, "github.com");
    assert_eq!(coordinate.owner, "apache");
    assert_eq!(coordinate.repo, "airflow");
    assert_eq!(coordinate.branch, "");
    assert_eq!(coordinate.directory, "");
}

#[test]
fn trailing_slash_is_stripped_before_splitting() {
    let coordinate = parse_repo_url("https://github.com/apache/airflow/").expect("should parse");

    assert_eq!(coordinate.repo, "airflow");
    assert_eq!(coordinate.branch, "");
    assert_eq!(coordinate.directory, "");
}

#[test]
fn branch_defaults_to_main_without_tree_marker() {
    let coordinate =
        parse_repo_url("https://github.com/apache/airflow/main/airflow-core/docs").expect("parse");

    assert_eq!(coordinate.branch, "main");
    assert_eq!(coordinate.directory, "airflow-core/docs");
}

#[test]
fn directory_defaults_to_docs_at_the_branch_boundary() {
    // Path ends exactly at the branch segment: the docs default applies.
    let coordinate =
        parse_repo_url("https://github.com/apache/airflow/tree/main").expect("should parse");

    assert_eq!(coordinate.branch, "main");
    assert_eq!(coordinate.directory, "docs");
}

#[test]
fn four_segment_url_defaults_branch_and_directory() {
    let coordinate =
        parse_repo_url("https://github.com/apache/airflow/anything").expect("should parse");

    assert_eq!(coordinate.branch, "main");
    assert_eq!(coordinate.directory, "docs");
}

#[test]
fn tree_url_with_subdirectory_parses_branch_and_directory() {
    // End-to-end scenario A from the acceptance checklist.
    let coordinate =
        parse_repo_url("https://github.com/apache/airflow/tree/main/airflow-core/docs")
            .expect("should parse");

    assert_eq!(coordinate.owner, "apache");
    assert_eq!(coordinate.repo, "airflow");
    assert_eq!(coordinate.branch, "main");
    assert_eq!(coordinate.directory, "airflow-core/docs");
}

#[test]
fn rejects_non_https_url() {
    let result = parse_repo_url("http://github.com/apache/airflow");
    assert!(matches!(result, Err(PipelineError::InvalidInput(_))));
}

#[test]
fn rejects_unsupported_provider() {
    let result = parse_repo_url("https://gitlab.com/apache/airflow");
    let err = result.expect_err("gitlab should be rejected");
    assert!(matches!(err, PipelineError::InvalidInput(_)));
    assert!(err.to_string().contains("unsupported provider"));
}

#[test]
fn rejects_url_with_too_few_segments() {
    let result = parse_repo_url("https://github.com/apache");
    assert!(matches!(result, Err(PipelineError::InvalidInput(_))));
}

#[test]
fn rejects_empty_owner_or_repo() {
    let result = parse_repo_url("https://github.com//airflow");
    assert!(matches!(result, Err(PipelineError::InvalidInput(_))));
}
