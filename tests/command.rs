use std::path::Path;
use std::time::Duration;

use repo2pdf::command::CommandRunner;
use repo2pdf::error::{CommandError, PipelineError};

#[tokio::test]
async fn successful_command_returns_output() {
    let runner = CommandRunner::new(Duration::from_secs(5));

    let output = runner
        .run("sh", &["-c", "echo hello"], None)
        .await
        .expect("should succeed");
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "hello");
}

#[tokio::test]
async fn command_runs_in_the_given_working_directory() {
    let dir = tempfile::tempdir().expect("tempdir");
    let runner = CommandRunner::new(Duration::from_secs(5));

    let output = runner
        .run("pwd", &[], Some(dir.path()))
        .await
        .expect("should succeed");
    let printed = String::from_utf8_lossy(&output.stdout).trim().to_string();
    assert!(
        Path::new(&printed).ends_with(dir.path().file_name().expect("dir name")),
        "pwd printed {printed}"
    );
}

#[tokio::test]
async fn non_zero_exit_surfaces_status_and_stderr() {
    let runner = CommandRunner::new(Duration::from_secs(5));

    let err = runner
        .run("sh", &["-c", "echo broken >&2; exit 3"], None)
        .await
        .expect_err("should fail");

    match err {
        CommandError::Failed { status, stderr, .. } => {
            assert_eq!(status.code(), Some(3));
            assert!(stderr.contains("broken"));
        }
        other => panic!("expected Failed, got {other:?}"),
    }
}

#[tokio::test]
async fn hung_command_is_killed_at_the_deadline() {
    let runner = CommandRunner::new(Duration::from_millis(200));

    let err = runner
        .run("sleep", &["5"], None)
        .await
        .expect_err("should time out");
    assert!(matches!(err, CommandError::Timeout { .. }));
}

#[tokio::test]
async fn unknown_binary_is_a_spawn_error() {
    let runner = CommandRunner::new(Duration::from_secs(5));

    let err = runner
        .run("definitely-not-a-real-binary-xyz", &[], None)
        .await
        .expect_err("should fail to spawn");
    assert!(matches!(err, CommandError::Spawn { .. }));
}

#[test]
fn timeouts_keep_their_own_taxonomy_variant() {
    let timeout = CommandError::Timeout {
        command: "sleep 5".to_string(),
        timeout_secs: 1,
    };
    assert!(matches!(
        timeout.into_stage(PipelineError::SyncFailure),
        PipelineError::Timeout(_)
    ));
}
