//! End-to-end runs against real shell children.

#![cfg(unix)]

use std::time::Duration;

use ffrun::exec::{Executor, ShellSpawner};
use ffrun_test_utils::{init_tracing, with_timeout};

#[tokio::test]
async fn captures_stdout_and_reports_clean_exit() {
    init_tracing();

    let executor = Executor::new(ShellSpawner);
    let report = with_timeout(executor.execute("echo hello")).await.unwrap();

    assert!(report.transcript.contains("hello"));
    assert_eq!(report.exit_code, 0);
    assert!(report.success);
}

#[tokio::test]
async fn stderr_is_merged_into_the_transcript() {
    init_tracing();

    let executor = Executor::new(ShellSpawner);
    let report = with_timeout(executor.execute("echo out; echo err 1>&2"))
        .await
        .unwrap();

    assert!(report.transcript.contains("out"));
    assert!(report.transcript.contains("err"));
    assert!(report.success);
}

#[tokio::test]
async fn nonzero_exit_code_is_propagated() {
    init_tracing();

    let executor = Executor::new(ShellSpawner);
    let report = with_timeout(executor.execute("exit 7")).await.unwrap();

    assert_eq!(report.exit_code, 7);
    assert!(!report.success);
}

#[tokio::test]
async fn error_line_from_a_real_child_is_recorded() {
    init_tracing();

    let executor = Executor::new(ShellSpawner);
    let report = with_timeout(executor.execute("echo 'Error: Invalid argument'; exit 1"))
        .await
        .unwrap();

    assert_eq!(report.last_error_line, "Error: Invalid argument");
    assert!(!report.success);
    assert_eq!(report.exit_code, 1);
}

#[tokio::test]
async fn overwrite_prompt_round_trip_feeds_the_child() {
    init_tracing();

    // The child prints a prompt, then blocks on stdin; the engine must
    // answer it for the run to finish at all.
    let command = r#"printf "File 'out.mp4' already exists. Overwrite? [y/N]\n"; read answer; echo "answer=$answer""#;

    let executor = Executor::new(ShellSpawner);
    let report = with_timeout(executor.execute(command)).await.unwrap();

    assert!(report.overwrite_prompted);
    assert!(report.overwrite_confirmed);
    assert!(report.transcript.contains("answer=y"));
    assert!(report.success);
}

#[tokio::test]
async fn stop_kills_a_long_running_child() {
    init_tracing();

    let executor = Executor::new(ShellSpawner);
    let background = {
        let executor = executor.clone();
        tokio::spawn(async move { executor.execute("sleep 30").await })
    };

    for _ in 0..200 {
        if executor.is_running() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert!(executor.is_running());

    executor.stop();
    let report = with_timeout(async { background.await.unwrap() })
        .await
        .unwrap();

    // Killed by signal: no exit code was observed.
    assert_eq!(report.exit_code, -1);
    assert!(!report.success);
    assert!(!executor.is_running());
}
