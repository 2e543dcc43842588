use std::time::Duration;

use ffrun::errors::FfrunError;
use ffrun::exec::Executor;
use ffrun_test_utils::scripted::ScriptBuilder;
use ffrun_test_utils::{init_tracing, with_timeout};

#[tokio::test]
async fn prompt_is_confirmed_and_answer_fed() {
    init_tracing();

    let spawner = ScriptBuilder::new()
        .line("File 'out.mp4' already exists. Overwrite? [y/N]")
        .line("frame=  100 fps= 25")
        .exit_code(0)
        .build();
    let executor = Executor::new(spawner.clone());

    let report = with_timeout(executor.execute("ffmpeg -i in.mp4 out.mp4"))
        .await
        .unwrap();

    assert!(report.overwrite_prompted);
    assert!(report.overwrite_confirmed);
    assert_eq!(spawner.fed_input(), b"y\n");
    // Exit 0 with no error recorded counts as success.
    assert!(report.success);
    assert_eq!(report.exit_code, 0);
}

#[tokio::test]
async fn prompt_is_not_answered_when_auto_overwrite_disabled() {
    init_tracing();

    let spawner = ScriptBuilder::new()
        .line("File 'out.mp4' already exists. Overwrite? [y/N]")
        .exit_code(0)
        .build();
    let executor = Executor::new(spawner.clone());
    executor.set_auto_overwrite(false);

    let report = with_timeout(executor.execute("ffmpeg -i in.mp4 out.mp4"))
        .await
        .unwrap();

    assert!(report.overwrite_prompted);
    assert!(!report.overwrite_confirmed);
    assert!(spawner.fed_input().is_empty());
}

#[tokio::test]
async fn chinese_prompt_is_detected() {
    init_tracing();

    let spawner = ScriptBuilder::new()
        .line("文件已存在，是否覆盖？")
        .exit_code(0)
        .build();
    let executor = Executor::new(spawner.clone());

    let report = with_timeout(executor.execute("ffmpeg -i in.mp4 out.mp4"))
        .await
        .unwrap();

    assert!(report.overwrite_prompted);
    assert!(report.overwrite_confirmed);
    assert_eq!(spawner.fed_input(), b"y\n");
}

#[tokio::test]
async fn error_line_is_recorded_verbatim() {
    init_tracing();

    let spawner = ScriptBuilder::new()
        .line("Error: Invalid argument")
        .exit_code(1)
        .build();
    let executor = Executor::new(spawner);

    let report = with_timeout(executor.execute("ffmpeg -i missing.mp4 out.mp4"))
        .await
        .unwrap();

    assert_eq!(report.last_error_line, "Error: Invalid argument");
    assert!(!report.success);
    assert_eq!(report.exit_code, 1);
    // No prompt was involved.
    assert!(!report.overwrite_prompted);
    assert!(!report.overwrite_confirmed);

    // The executor surface remembers the line after the run.
    assert_eq!(executor.last_error(), "Error: Invalid argument");
}

#[tokio::test]
async fn non_monotonous_warning_is_not_an_error() {
    init_tracing();

    let spawner = ScriptBuilder::new()
        .line("[mp4 @ 0x55aa] Non-monotonous DTS in output stream 0:1; changing to 183")
        .line("Error: non-monotonous DTS noise repeated")
        .exit_code(0)
        .build();
    let executor = Executor::new(spawner);

    let report = with_timeout(executor.execute("ffmpeg -i in.mp4 out.mp4"))
        .await
        .unwrap();

    assert!(report.last_error_line.is_empty());
    // Clean exit plus no recorded error means success.
    assert!(report.success);
}

#[tokio::test]
async fn late_success_line_overrides_earlier_error() {
    init_tracing();

    // Last-write-wins between the error and success heuristics is kept
    // deliberately: the summary line flips success back on even though an
    // error was recorded earlier in the same run.
    let spawner = ScriptBuilder::new()
        .line("Error: something failed mid-stream")
        .line("video:1022kB audio:161kB subtitle:0kB other streams:0kB global headers:0kB muxing overhead: 0.522%")
        .exit_code(1)
        .build();
    let executor = Executor::new(spawner);

    let report = with_timeout(executor.execute("ffmpeg -i in.mp4 out.mp4"))
        .await
        .unwrap();

    assert!(report.success);
    assert_eq!(report.last_error_line, "Error: something failed mid-stream");
    assert_eq!(report.exit_code, 1);
}

#[tokio::test]
async fn clean_exit_without_patterns_is_success() {
    init_tracing();

    let spawner = ScriptBuilder::new()
        .line("frame=  240 fps= 60 q=28.0 size=    1024KiB")
        .exit_code(0)
        .build();
    let executor = Executor::new(spawner);

    let report = with_timeout(executor.execute("ffmpeg -i in.mp4 out.mp4"))
        .await
        .unwrap();

    assert!(report.success);
    assert_eq!(report.exit_code, 0);
    assert!(report.last_error_line.is_empty());
}

#[tokio::test]
async fn nonzero_exit_without_patterns_is_failure() {
    init_tracing();

    let spawner = ScriptBuilder::new()
        .line("some unclassified output")
        .exit_code(3)
        .build();
    let executor = Executor::new(spawner);

    let report = with_timeout(executor.execute("ffmpeg -i in.mp4 out.mp4"))
        .await
        .unwrap();

    assert!(!report.success);
    assert_eq!(report.exit_code, 3);
}

#[tokio::test]
async fn transcript_preserves_order_across_chunk_splits() {
    init_tracing();

    let spawner = ScriptBuilder::new()
        .chunk(b"fra")
        .chunk(b"me=1\nframe=2\n")
        .exit_code(0)
        .build();
    let executor = Executor::new(spawner);

    let report = with_timeout(executor.execute("ffmpeg -i in.mp4 out.mp4"))
        .await
        .unwrap();

    assert_eq!(report.transcript, "frame=1\nframe=2\n");
}

#[tokio::test]
async fn trailing_partial_line_is_kept() {
    init_tracing();

    let spawner = ScriptBuilder::new()
        .chunk(b"tail without newline")
        .exit_code(0)
        .build();
    let executor = Executor::new(spawner);

    let report = with_timeout(executor.execute("ffmpeg -i in.mp4 out.mp4"))
        .await
        .unwrap();

    assert_eq!(report.transcript, "tail without newline\n");
}

#[tokio::test]
async fn second_execute_is_rejected_while_running() {
    init_tracing();

    let spawner = ScriptBuilder::new().line("running").linger().build();
    let executor = Executor::new(spawner.clone());

    let background = {
        let executor = executor.clone();
        tokio::spawn(async move { executor.execute("ffmpeg -i a.mp4 out.mp4").await })
    };

    // Wait until the first run is actually in flight.
    for _ in 0..200 {
        if executor.is_running() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert!(executor.is_running());

    let err = executor
        .execute("ffmpeg -i b.mp4 out.mp4")
        .await
        .unwrap_err();
    assert!(matches!(err, FfrunError::AlreadyRunning));
    // The rejected call never reached the spawner.
    assert_eq!(spawner.spawn_count(), 1);

    executor.stop();
    let report = with_timeout(async { background.await.unwrap() })
        .await
        .unwrap();
    assert!(report.transcript.contains("running"));
    // Killed child: termination was never observed with a code.
    assert_eq!(report.exit_code, -1);
    assert!(!report.success);
    assert!(!executor.is_running());
}

#[tokio::test]
async fn stop_preserves_accumulated_transcript() {
    init_tracing();

    let spawner = ScriptBuilder::new()
        .line("frame=1")
        .line("frame=2")
        .linger()
        .build();
    let executor = Executor::new(spawner);

    let background = {
        let executor = executor.clone();
        tokio::spawn(async move { executor.execute("ffmpeg -i a.mp4 out.mp4").await })
    };

    for _ in 0..200 {
        if executor.is_running() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    // Give the read loop a moment to consume the scripted lines.
    tokio::time::sleep(Duration::from_millis(50)).await;

    executor.stop();
    let report = with_timeout(async { background.await.unwrap() })
        .await
        .unwrap();

    assert!(report.transcript.contains("frame=1"));
    assert!(report.transcript.contains("frame=2"));
}

#[tokio::test]
async fn launch_failure_is_fatal_and_resets_the_guard() {
    init_tracing();

    let spawner = ScriptBuilder::new().fail_launch("no such binary").build();
    let executor = Executor::new(spawner.clone());

    let err = executor.execute("nonexistent-tool -i x").await.unwrap_err();
    assert!(matches!(err, FfrunError::Launch { .. }));
    assert_eq!(spawner.spawn_count(), 0);
    assert!(!executor.is_running());
    assert!(executor.last_error().contains("no such binary"));

    // The guard was released, so the next run may proceed.
    let ok_spawner = ScriptBuilder::new().exit_code(0).build();
    let executor = Executor::new(ok_spawner);
    let report = with_timeout(executor.execute("echo fine")).await.unwrap();
    assert!(report.success);
}

#[tokio::test]
async fn stop_without_a_run_is_a_noop() {
    init_tracing();

    let spawner = ScriptBuilder::new().exit_code(0).build();
    let executor = Executor::new(spawner);

    executor.stop();
    executor.stop();
    assert!(!executor.is_running());

    // Still usable afterwards.
    let report = with_timeout(executor.execute("echo fine")).await.unwrap();
    assert!(report.success);
}
