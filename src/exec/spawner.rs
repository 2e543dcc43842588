// src/exec/spawner.rs

//! Child process creation behind a swappable interface.
//!
//! The executor talks to a [`ProcessSpawner`] instead of `tokio::process`
//! directly. Production uses [`ShellSpawner`], which hands the command
//! string to the platform shell verbatim; tests substitute scripted fakes
//! that replay canned output without touching the OS.

use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::errors::{FfrunError, Result};

/// Read side of the capture channel: byte chunks from the child's merged
/// stdout+stderr, in arrival order.
pub type CaptureRx = mpsc::Receiver<Vec<u8>>;

/// Write side of the feed channel: byte chunks destined for the child's
/// stdin.
pub type FeedTx = mpsc::Sender<Vec<u8>>;

/// Handle to a live child: exit-code retrieval and forced termination.
///
/// `wait` must be cancel safe: the executor polls it inside a `select!`
/// and may drop the returned future before it resolves.
pub trait ChildHandle: Send {
    /// Wait for the child to exit and return its exit code.
    ///
    /// `None` means the code could not be retrieved (terminated by signal,
    /// or the wait itself failed).
    fn wait(&mut self) -> Pin<Box<dyn Future<Output = Option<i32>> + Send + '_>>;

    /// Forcefully terminate the child. Best-effort.
    fn kill(&mut self) -> Pin<Box<dyn Future<Output = ()> + Send + '_>>;
}

/// A freshly spawned child with its two pipe endpoints.
pub struct SpawnedChild {
    /// Merged stdout+stderr of the child.
    pub capture: CaptureRx,
    /// Channel feeding the child's stdin.
    pub feed: FeedTx,
    /// Liveness / termination handle.
    pub handle: Box<dyn ChildHandle>,
}

/// Trait abstracting how a command string becomes a supervised child.
pub trait ProcessSpawner: Send + Sync {
    fn spawn(&self, command: &str) -> Result<SpawnedChild>;
}

/// Spawner that passes the command string to the system shell exactly as
/// given (`sh -c` on Unix, `cmd /C` on Windows).
#[derive(Debug, Clone, Default)]
pub struct ShellSpawner;

impl ProcessSpawner for ShellSpawner {
    fn spawn(&self, command: &str) -> Result<SpawnedChild> {
        let mut cmd = if cfg!(windows) {
            let mut c = Command::new("cmd");
            c.arg("/C").arg(command);
            c
        } else {
            let mut c = Command::new("sh");
            c.arg("-c").arg(command);
            c
        };

        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|e| FfrunError::Launch {
            message: format!("spawning `{command}`: {e}"),
        })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let stdin = child.stdin.take();

        // Both output pipes drain into one channel; whichever pump reads
        // first sends first, preserving arrival order into the classifier.
        let (cap_tx, cap_rx) = mpsc::channel::<Vec<u8>>(64);
        if let Some(stdout) = stdout {
            spawn_capture_pump(stdout, cap_tx.clone());
        }
        if let Some(stderr) = stderr {
            spawn_capture_pump(stderr, cap_tx);
        }

        let (feed_tx, feed_rx) = mpsc::channel::<Vec<u8>>(8);
        if let Some(stdin) = stdin {
            spawn_feed_pump(stdin, feed_rx);
        }

        Ok(SpawnedChild {
            capture: cap_rx,
            feed: feed_tx,
            handle: Box::new(TokioChildHandle { child }),
        })
    }
}

/// Forward one output pipe into the capture channel until EOF.
fn spawn_capture_pump(mut pipe: impl AsyncRead + Unpin + Send + 'static, tx: mpsc::Sender<Vec<u8>>) {
    tokio::spawn(async move {
        let mut buf = [0u8; 4096];
        loop {
            match pipe.read(&mut buf).await {
                Ok(0) => break,
                Ok(n) => {
                    if tx.send(buf[..n].to_vec()).await.is_err() {
                        break; // receiver gone; nothing left to supervise
                    }
                }
                Err(e) => {
                    debug!(error = %e, "capture pipe read failed; stopping pump");
                    break;
                }
            }
        }
    });
}

/// Forward feed-channel chunks into the child's stdin.
///
/// Write failures end the pump silently; the child may have exited or
/// closed its input already.
fn spawn_feed_pump(mut stdin: tokio::process::ChildStdin, mut rx: mpsc::Receiver<Vec<u8>>) {
    tokio::spawn(async move {
        while let Some(bytes) = rx.recv().await {
            if let Err(e) = stdin.write_all(&bytes).await {
                warn!(error = %e, "feed pipe write failed; dropping input");
                break;
            }
            let _ = stdin.flush().await;
        }
    });
}

struct TokioChildHandle {
    child: tokio::process::Child,
}

impl ChildHandle for TokioChildHandle {
    fn wait(&mut self) -> Pin<Box<dyn Future<Output = Option<i32>> + Send + '_>> {
        Box::pin(async move {
            match self.child.wait().await {
                Ok(status) => status.code(),
                Err(e) => {
                    warn!(error = %e, "waiting for child failed");
                    None
                }
            }
        })
    }

    fn kill(&mut self) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(async move {
            if let Err(e) = self.child.kill().await {
                debug!(error = %e, "failed to kill child (may have already exited)");
            }
        })
    }
}
