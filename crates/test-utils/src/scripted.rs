use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::{mpsc, oneshot};

use ffrun::errors::{FfrunError, Result};
use ffrun::exec::spawner::{ChildHandle, ProcessSpawner, SpawnedChild};

/// A fake [`ProcessSpawner`] that replays a canned child instead of
/// spawning a real process:
/// - emits the scripted output chunks on the capture channel, in order
/// - then either exits with the scripted code, or lingers until killed
/// - records every spawned command and everything fed to the child's stdin.
#[derive(Clone)]
pub struct ScriptedSpawner {
    script: Script,
    spawn_count: Arc<AtomicUsize>,
    commands: Arc<Mutex<Vec<String>>>,
    feed_taps: Arc<Mutex<Vec<mpsc::Receiver<Vec<u8>>>>>,
}

#[derive(Debug, Clone, Default)]
struct Script {
    chunks: Vec<Vec<u8>>,
    exit_code: Option<i32>,
    linger: bool,
    fail_launch: Option<String>,
}

/// Builder for [`ScriptedSpawner`].
#[derive(Debug, Clone, Default)]
pub struct ScriptBuilder {
    script: Script,
}

impl ScriptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit one newline-terminated line as its own chunk.
    pub fn line(mut self, line: &str) -> Self {
        self.script.chunks.push(format!("{line}\n").into_bytes());
        self
    }

    /// Emit raw bytes as one chunk (no newline appended).
    pub fn chunk(mut self, bytes: &[u8]) -> Self {
        self.script.chunks.push(bytes.to_vec());
        self
    }

    /// Exit with this code after emitting every chunk.
    pub fn exit_code(mut self, code: i32) -> Self {
        self.script.exit_code = Some(code);
        self
    }

    /// Keep the pipes open after emitting; the child only goes away when
    /// the supervisor kills it.
    pub fn linger(mut self) -> Self {
        self.script.linger = true;
        self
    }

    /// Refuse to spawn at all.
    pub fn fail_launch(mut self, message: &str) -> Self {
        self.script.fail_launch = Some(message.to_string());
        self
    }

    pub fn build(self) -> ScriptedSpawner {
        ScriptedSpawner {
            script: self.script,
            spawn_count: Arc::new(AtomicUsize::new(0)),
            commands: Arc::new(Mutex::new(Vec::new())),
            feed_taps: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl ScriptedSpawner {
    /// How many children were actually spawned (launch failures excluded).
    pub fn spawn_count(&self) -> usize {
        self.spawn_count.load(Ordering::SeqCst)
    }

    /// Every command string passed to `spawn`, including rejected launches.
    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }

    /// Drain and return everything the supervisor fed to children's stdin.
    ///
    /// Call after `execute` has returned; consumes the buffered input.
    pub fn fed_input(&self) -> Vec<u8> {
        let mut taps = self.feed_taps.lock().unwrap();
        let mut bytes = Vec::new();
        for rx in taps.iter_mut() {
            while let Ok(chunk) = rx.try_recv() {
                bytes.extend_from_slice(&chunk);
            }
        }
        bytes
    }
}

impl ProcessSpawner for ScriptedSpawner {
    fn spawn(&self, command: &str) -> Result<SpawnedChild> {
        self.commands.lock().unwrap().push(command.to_string());

        if let Some(message) = &self.script.fail_launch {
            return Err(FfrunError::Launch {
                message: message.clone(),
            });
        }

        self.spawn_count.fetch_add(1, Ordering::SeqCst);

        let (cap_tx, cap_rx) = mpsc::channel::<Vec<u8>>(64);
        let (feed_tx, feed_rx) = mpsc::channel::<Vec<u8>>(8);
        self.feed_taps.lock().unwrap().push(feed_rx);

        let (exit_tx, exit_rx) = oneshot::channel::<Option<i32>>();
        let (kill_tx, kill_rx) = oneshot::channel::<()>();

        let chunks = self.script.chunks.clone();
        let exit_code = self.script.exit_code;
        let linger = self.script.linger;

        tokio::spawn(async move {
            for chunk in chunks {
                if cap_tx.send(chunk).await.is_err() {
                    return;
                }
            }
            if linger {
                // Hold the pipes open until the supervisor kills us.
                let _ = kill_rx.await;
                drop(cap_tx);
                let _ = exit_tx.send(None);
            } else {
                drop(cap_tx);
                let _ = exit_tx.send(exit_code);
            }
        });

        Ok(SpawnedChild {
            capture: cap_rx,
            feed: feed_tx,
            handle: Box::new(ScriptedHandle {
                exit_rx: Some(exit_rx),
                finished: None,
                kill_tx: Some(kill_tx),
            }),
        })
    }
}

struct ScriptedHandle {
    exit_rx: Option<oneshot::Receiver<Option<i32>>>,
    finished: Option<Option<i32>>,
    kill_tx: Option<oneshot::Sender<()>>,
}

impl ChildHandle for ScriptedHandle {
    fn wait(&mut self) -> Pin<Box<dyn Future<Output = Option<i32>> + Send + '_>> {
        Box::pin(async move {
            if let Some(code) = self.finished {
                return code;
            }
            let code = match self.exit_rx.as_mut() {
                Some(rx) => rx.await.ok().flatten(),
                None => None,
            };
            self.finished = Some(code);
            code
        })
    }

    fn kill(&mut self) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        let kill_tx = self.kill_tx.take();
        Box::pin(async move {
            if let Some(tx) = kill_tx {
                let _ = tx.send(());
            }
        })
    }
}
