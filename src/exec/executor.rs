// src/exec/executor.rs

//! The supervision engine: one child at a time, classified line by line.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::oneshot;
use tracing::{debug, info};

use crate::errors::{FfrunError, Result};
use crate::exec::patterns;
use crate::exec::scanner::LineScanner;
use crate::exec::spawner::{FeedTx, ProcessSpawner, SpawnedChild};
use crate::exec::RunReport;

/// Affirmative answer injected when an overwrite prompt is auto-confirmed.
const CONFIRM_TOKEN: &[u8] = b"y\n";

/// How long the final drain waits for more output after the child exited.
///
/// Bounds the drain so a grandchild that inherited the write end of the
/// pipes cannot wedge the call forever.
const FINAL_DRAIN_QUIET: Duration = Duration::from_millis(500);

/// Runs one command at a time under supervision.
///
/// `execute` spawns the child through the configured [`ProcessSpawner`],
/// reads its merged output, classifies every line, optionally answers
/// overwrite prompts, and returns a [`RunReport`] once the child is gone.
///
/// Clones share the same state, so a clone handed to a signal handler can
/// `stop()` the run owned by the original.
pub struct Executor<S: ProcessSpawner> {
    spawner: S,
    state: Arc<ExecutorState>,
}

/// Shared per-instance state: the single-run guard, the overwrite policy,
/// the cancel signal for the live child, and the most recent error line.
struct ExecutorState {
    running: AtomicBool,
    auto_overwrite: AtomicBool,
    cancel: Mutex<Option<oneshot::Sender<()>>>,
    last_error: Mutex<String>,
}

impl<S: ProcessSpawner> Executor<S> {
    /// Create an executor with auto-overwrite enabled (the historical
    /// default of the tool).
    pub fn new(spawner: S) -> Self {
        Self {
            spawner,
            state: Arc::new(ExecutorState {
                running: AtomicBool::new(false),
                auto_overwrite: AtomicBool::new(true),
                cancel: Mutex::new(None),
                last_error: Mutex::new(String::new()),
            }),
        }
    }

    /// Whether overwrite prompts are answered automatically.
    pub fn set_auto_overwrite(&self, enabled: bool) {
        self.state.auto_overwrite.store(enabled, Ordering::SeqCst);
    }

    /// Is a supervised run currently in flight?
    pub fn is_running(&self) -> bool {
        self.state.running.load(Ordering::SeqCst)
    }

    /// The error line recorded by the most recent run (empty if none).
    pub fn last_error(&self) -> String {
        self.state.last_error.lock().unwrap().clone()
    }

    /// Terminate the in-flight child, if any.
    ///
    /// The running `execute` call returns the report accumulated so far.
    /// Idempotent: a no-op when nothing is running.
    pub fn stop(&self) {
        self.state.running.store(false, Ordering::SeqCst);
        let sender = self.state.cancel.lock().unwrap().take();
        if let Some(tx) = sender {
            if tx.send(()).is_err() {
                debug!("stop requested but the run already finished");
            }
        }
    }

    /// Run `command` under supervision and return everything observed.
    ///
    /// The command string goes to the spawner verbatim. Fails fast with
    /// [`FfrunError::AlreadyRunning`] if a run is in flight, or
    /// [`FfrunError::Launch`] if the child could not be created; stream
    /// anomalies after launch are absorbed into the report instead.
    pub async fn execute(&self, command: &str) -> Result<RunReport> {
        if self
            .state
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(FfrunError::AlreadyRunning);
        }

        info!(command, "starting supervised run");

        let spawned = match self.spawner.spawn(command) {
            Ok(s) => s,
            Err(e) => {
                *self.state.last_error.lock().unwrap() = e.to_string();
                self.state.running.store(false, Ordering::SeqCst);
                return Err(e);
            }
        };

        let (cancel_tx, cancel_rx) = oneshot::channel();
        *self.state.cancel.lock().unwrap() = Some(cancel_tx);

        let report = self.supervise(spawned, cancel_rx).await;

        *self.state.cancel.lock().unwrap() = None;
        *self.state.last_error.lock().unwrap() = report.last_error_line.clone();
        self.state.running.store(false, Ordering::SeqCst);

        info!(
            success = report.success,
            exit_code = report.exit_code,
            "supervised run finished"
        );

        Ok(report)
    }

    /// The read/classify/respond loop. Owns the report until it returns it.
    async fn supervise(
        &self,
        spawned: SpawnedChild,
        mut cancel_rx: oneshot::Receiver<()>,
    ) -> RunReport {
        let SpawnedChild {
            mut capture,
            feed,
            mut handle,
        } = spawned;

        let mut report = RunReport::new();
        let mut scanner = LineScanner::new();
        let mut exit_code: Option<i32> = None;
        let mut exited = false;
        let mut closed = false;
        let mut cancelled = false;

        // Read loop: until the child exits or both pipe ends close.
        while !exited && !closed {
            tokio::select! {
                maybe_chunk = capture.recv() => match maybe_chunk {
                    Some(chunk) => {
                        for line in scanner.push(&chunk) {
                            self.observe_line(&mut report, &line, &feed);
                        }
                    }
                    None => closed = true,
                },
                code = handle.wait() => {
                    exited = true;
                    exit_code = code;
                }
                _ = &mut cancel_rx, if !cancelled => {
                    cancelled = true;
                    info!("stop requested; terminating child");
                    handle.kill().await;
                }
            }
        }

        // Pipes closed before the exit status was observed.
        if !exited {
            tokio::select! {
                code = handle.wait() => exit_code = code,
                _ = &mut cancel_rx, if !cancelled => {
                    handle.kill().await;
                    exit_code = handle.wait().await;
                }
            }
        }

        // Final drain: collect whatever the pumps still hold.
        while !closed {
            match tokio::time::timeout(FINAL_DRAIN_QUIET, capture.recv()).await {
                Ok(Some(chunk)) => {
                    for line in scanner.push(&chunk) {
                        self.observe_line(&mut report, &line, &feed);
                    }
                }
                Ok(None) => closed = true,
                Err(_) => {
                    debug!("capture stayed open after child exit; abandoning drain");
                    break;
                }
            }
        }

        // Trailing bytes with no final newline still count as a line.
        if let Some(tail) = scanner.finish() {
            self.observe_line(&mut report, &tail, &feed);
        }

        if let Some(code) = exit_code {
            report.exit_code = code;
            // Exit-code tie-break: a clean exit with no pattern verdicts and
            // no recorded error counts as success. Never unsets an earlier
            // pattern-set success.
            if code == 0 && !report.success && report.last_error_line.is_empty() {
                report.success = true;
            }
        }

        report
    }

    /// Fold one completed line into the report and react to it.
    ///
    /// The three tests are independent; every applicable effect fires.
    fn observe_line(&self, report: &mut RunReport, line: &str, feed: &FeedTx) {
        report.transcript.push_str(line);
        report.transcript.push('\n');

        if patterns::is_overwrite_prompt(line) {
            debug!(line, "overwrite prompt detected");
            report.overwrite_prompted = true;
            if self.state.auto_overwrite.load(Ordering::SeqCst) {
                report.overwrite_confirmed = true;
                // Fire-and-forget: the child may already have closed stdin.
                if feed.try_send(CONFIRM_TOKEN.to_vec()).is_err() {
                    debug!("confirmation write refused; child input unavailable");
                }
            }
        }

        if patterns::is_error_line(line) {
            report.last_error_line = line.to_string();
        }

        if patterns::is_success_line(line) {
            report.success = true;
        }
    }
}

impl<S: ProcessSpawner + Clone> Clone for Executor<S> {
    fn clone(&self) -> Self {
        Self {
            spawner: self.spawner.clone(),
            state: Arc::clone(&self.state),
        }
    }
}

impl<S: ProcessSpawner> fmt::Debug for Executor<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Executor")
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}
