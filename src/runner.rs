//! External interpreter bridge
//!
//! Runs the saved script through an interpreter and streams its output
//! back as events. Exactly one invocation may be outstanding at a time;
//! the UI drains events on its own thread and re-enables the run action
//! when `Finished` arrives.

use crossbeam::channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;
use std::path::Path;
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tracing::{debug, warn};

/// Output marshaled from the child process to the UI thread
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunEvent {
    /// A chunk of standard output, decoded as UTF-8
    Stdout(String),
    /// A chunk of standard error, decoded as UTF-8
    Stderr(String),
    /// The process exited
    Finished { success: bool },
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("a script is already running")]
    Busy,
    #[error("could not start {interpreter}: {source}")]
    Spawn {
        interpreter: String,
        source: std::io::Error,
    },
}

/// One-shot script runner on a private async runtime
pub struct ScriptRunner {
    runtime: tokio::runtime::Runtime,
    tx: Sender<RunEvent>,
    rx: Receiver<RunEvent>,
    running: Arc<AtomicBool>,
    supervisor: Mutex<Option<tokio::task::JoinHandle<()>>>,
}

impl ScriptRunner {
    pub fn new() -> Self {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .expect("failed to start runner runtime");
        let (tx, rx) = unbounded();
        Self {
            runtime,
            tx,
            rx,
            running: Arc::new(AtomicBool::new(false)),
            supervisor: Mutex::new(None),
        }
    }

    /// Whether an invocation is outstanding (run action disabled)
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Start `interpreter script`
    ///
    /// Fails fast with `Busy` while a previous invocation is outstanding,
    /// or with `Spawn` if the process cannot start (no events are produced
    /// in either case).
    pub fn run(&self, interpreter: &Path, script: &Path) -> Result<(), RunnerError> {
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(RunnerError::Busy);
        }

        let spawned = {
            let _guard = self.runtime.enter();
            Command::new(interpreter)
                .arg(script)
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true)
                .spawn()
        };
        let mut child = match spawned {
            Ok(child) => child,
            Err(source) => {
                self.running.store(false, Ordering::Release);
                warn!(interpreter = %interpreter.display(), error = %source, "spawn failed");
                return Err(RunnerError::Spawn {
                    interpreter: interpreter.display().to_string(),
                    source,
                });
            }
        };
        debug!(interpreter = %interpreter.display(), script = %script.display(), "started");

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let tx = self.tx.clone();
        let running = self.running.clone();

        let handle = self.runtime.spawn(async move {
            let out_pump = stdout.map(|s| tokio::spawn(pump(s, tx.clone(), false)));
            let err_pump = stderr.map(|s| tokio::spawn(pump(s, tx.clone(), true)));
            if let Some(task) = out_pump {
                let _ = task.await;
            }
            if let Some(task) = err_pump {
                let _ = task.await;
            }
            let success = match child.wait().await {
                Ok(status) => status.success(),
                Err(_) => false,
            };
            // Free the run slot before announcing completion, so whoever
            // observes Finished can immediately start the next run
            running.store(false, Ordering::Release);
            let _ = tx.send(RunEvent::Finished { success });
        });
        *self.supervisor.lock() = Some(handle);
        Ok(())
    }

    /// Drain pending events without blocking
    pub fn try_events(&self) -> Vec<RunEvent> {
        self.rx.try_iter().collect()
    }

    /// Block for the next event, up to `timeout`
    pub fn recv_timeout(&self, timeout: Duration) -> Option<RunEvent> {
        self.rx.recv_timeout(timeout).ok()
    }
}

impl Default for ScriptRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ScriptRunner {
    fn drop(&mut self) {
        // Abort any outstanding run; kill_on_drop reaps the child
        if let Some(handle) = self.supervisor.lock().take() {
            handle.abort();
        }
    }
}

/// Forward one output stream as events, chunk by chunk
async fn pump<R: AsyncRead + Unpin>(mut reader: R, tx: Sender<RunEvent>, is_stderr: bool) {
    let mut buf = [0u8; 4096];
    loop {
        match reader.read(&mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                let text = String::from_utf8_lossy(&buf[..n]).into_owned();
                let event = if is_stderr {
                    RunEvent::Stderr(text)
                } else {
                    RunEvent::Stdout(text)
                };
                if tx.send(event).is_err() {
                    break;
                }
            }
        }
    }
}
