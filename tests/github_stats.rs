use std::fs::write;

use chrono::{DateTime, Utc};
use serial_test::serial;
use tempfile::NamedTempFile;

use repo2pdf::github::{load_github_token, parse_repo_stats};

fn at(timestamp: &str) -> DateTime<Utc> {
    timestamp.parse().expect("valid timestamp")
}

#[test]
fn parses_stars_and_age_from_api_response() {
    let body = r#"{
        "stargazers_count": 42000,
        "created_at": "2020-01-01T00:00:00Z",
        "full_name": "apache/airflow"
    }"#;

    let stats = parse_repo_stats(body, at("2022-01-01T00:00:00Z")).expect("should parse");

    assert_eq!(stats.stars, 42000);
    assert!((stats.age_years - 2.0).abs() < 0.01, "age {}", stats.age_years);
}

#[test]
fn malformed_response_body_is_an_error() {
    assert!(parse_repo_stats("not json", at("2022-01-01T00:00:00Z")).is_err());
    assert!(parse_repo_stats(r#"{"stargazers_count": 10}"#, at("2022-01-01T00:00:00Z")).is_err());
}

#[test]
#[serial]
fn token_is_read_from_key_value_secret_file() {
    let secret = NamedTempFile::new().expect("temp file");
    write(secret.path(), "GITHUB_TOKEN=ghp_abc123\n").expect("write secret");

    let token = load_github_token(secret.path()).expect("should load");
    assert_eq!(token, "ghp_abc123");
}

#[test]
#[serial]
fn token_is_read_from_raw_secret_file() {
    let secret = NamedTempFile::new().expect("temp file");
    write(secret.path(), "ghp_raw456\n").expect("write secret");

    let token = load_github_token(secret.path()).expect("should load");
    assert_eq!(token, "ghp_raw456");
}

#[test]
#[serial]
fn missing_secret_file_falls_back_to_env_var() {
    std::env::set_var("GITHUB_TOKEN", "ghp_from_env");

    let token =
        load_github_token(std::path::Path::new("./no-such-secret-file")).expect("should load");
    assert_eq!(token, "ghp_from_env");

    std::env::remove_var("GITHUB_TOKEN");
}

#[test]
#[serial]
fn missing_secret_and_env_var_is_fatal() {
    std::env::remove_var("GITHUB_TOKEN");

    let result = load_github_token(std::path::Path::new("./no-such-secret-file"));
    assert!(result.is_err());
}
