//! Analyzer subprocess executor.
//!
//! Spawns the runtime, forwards its output to a sink line by line, and waits
//! for it to exit, honouring cancellation throughout.

use super::cancel::CancelToken;
use super::request::InvocationRequest;
use super::result::{ErrorKind, InvocationResult};
use super::sink::LineSink;
use std::io::{self, BufRead, BufReader, Read};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, warn};

/// How often a blocked run re-checks its cancel token.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Runs analyzer invocations. Holds no per-run state.
#[derive(Debug, Clone)]
pub struct Invoker {
    cancel: CancelToken,
    poll_interval: Duration,
}

impl Default for Invoker {
    fn default() -> Self {
        Self::new()
    }
}

impl Invoker {
    pub fn new() -> Self {
        Self::with_cancel(CancelToken::new())
    }

    pub fn with_cancel(cancel: CancelToken) -> Self {
        Self {
            cancel,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Run the analyzer once.
    ///
    /// Every output line is forwarded to `sink` before this returns. Failures
    /// that never reached an exit status are also written to `sink`.
    pub fn run(&self, request: &InvocationRequest, sink: &mut dyn LineSink) -> InvocationResult {
        let result = self.execute(request, sink);

        if let (Some(kind), Some(message)) = (result.error_kind, &result.message) {
            let header = match kind {
                ErrorKind::Interrupted => "[Tattletale] Error running tattletale - interrupted.",
                _ => "[Tattletale] Error running tattletale.",
            };
            // The sink may be what failed; the message stays in the result either way.
            if sink.line(header).and_then(|()| sink.line(message)).is_err() {
                warn!(%kind, %message, "could not write failure to build log");
            }
        }

        debug!(
            succeeded = result.succeeded,
            exit_code = ?result.exit_code,
            error_kind = ?result.error_kind,
            "tattletale run finished"
        );
        result
    }

    fn execute(&self, request: &InvocationRequest, sink: &mut dyn LineSink) -> InvocationResult {
        if let Some(field) = request.missing_field() {
            return InvocationResult::failed(
                ErrorKind::LaunchFailure,
                format!("{} must not be empty", field),
            );
        }

        let tool_path = request.resolved_tool_path();
        if !tool_path.is_file() {
            return InvocationResult::failed(
                ErrorKind::LaunchFailure,
                format!("tattletale jar '{}' not found", tool_path.display()),
            );
        }

        if self.cancel.is_cancelled() {
            return self.interrupted();
        }

        let mut command = Command::new(&request.runtime);
        command
            .args(request.args())
            .current_dir(&request.working_directory)
            .envs(&request.environment)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        debug!(
            command = %request.display_command(),
            cwd = %request.working_directory.display(),
            "launching tattletale"
        );

        let child = match command.spawn() {
            Ok(child) => child,
            Err(e) => {
                return InvocationResult::failed(
                    ErrorKind::LaunchFailure,
                    format!("failed to launch '{}': {}", request.runtime, e),
                );
            }
        };
        let mut child = ChildGuard::new(child);
        debug!(pid = child.id(), "tattletale started");

        let (tx, rx) = mpsc::channel();
        let mut readers = Vec::with_capacity(2);
        if let Some(stdout) = child.inner.stdout.take() {
            readers.push(spawn_reader(stdout, tx.clone()));
        }
        if let Some(stderr) = child.inner.stderr.take() {
            readers.push(spawn_reader(stderr, tx.clone()));
        }
        drop(tx);

        loop {
            if self.cancel.is_cancelled() {
                child.kill();
                return self.interrupted();
            }

            match rx.recv_timeout(self.poll_interval) {
                Ok(StreamEvent::Line(line)) => {
                    if let Err(e) = sink.line(&line) {
                        child.kill();
                        return InvocationResult::failed(
                            ErrorKind::IoFailure,
                            format!("failed to write tattletale output to build log: {}", e),
                        );
                    }
                }
                Ok(StreamEvent::Failed(e)) => {
                    child.kill();
                    return InvocationResult::failed(
                        ErrorKind::IoFailure,
                        format!("failed to read tattletale output: {}", e),
                    );
                }
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        // Both pipes hit end-of-stream, so the readers are finished.
        for reader in readers {
            let _ = reader.join();
        }

        loop {
            match child.try_wait() {
                Ok(Some(status)) => return InvocationResult::exited(exit_code(status)),
                Ok(None) => {
                    if self.cancel.is_cancelled() {
                        child.kill();
                        return self.interrupted();
                    }
                    thread::sleep(self.poll_interval);
                }
                Err(e) => {
                    child.kill();
                    return InvocationResult::failed(
                        ErrorKind::IoFailure,
                        format!("failed to wait for tattletale: {}", e),
                    );
                }
            }
        }
    }

    fn interrupted(&self) -> InvocationResult {
        InvocationResult::failed(
            ErrorKind::Interrupted,
            format!("tattletale run {}", self.cancel.reason()),
        )
    }
}

enum StreamEvent {
    Line(String),
    Failed(io::Error),
}

fn spawn_reader<R: Read + Send + 'static>(stream: R, tx: Sender<StreamEvent>) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut reader = BufReader::new(stream);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) => break,
                Ok(_) => {
                    let line = String::from_utf8_lossy(trim_line_ending(&buf)).into_owned();
                    if tx.send(StreamEvent::Line(line)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    let _ = tx.send(StreamEvent::Failed(e));
                    break;
                }
            }
        }
    })
}

fn trim_line_ending(buf: &[u8]) -> &[u8] {
    let buf = buf.strip_suffix(b"\n").unwrap_or(buf);
    buf.strip_suffix(b"\r").unwrap_or(buf)
}

/// Map an exit status to a code; signal deaths follow the shell's `128 + n`.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    -1
}

/// Owns the child for the duration of a run; kills and reaps it on drop.
struct ChildGuard {
    inner: Child,
    reaped: bool,
}

impl ChildGuard {
    fn new(inner: Child) -> Self {
        Self {
            inner,
            reaped: false,
        }
    }

    fn id(&self) -> u32 {
        self.inner.id()
    }

    fn try_wait(&mut self) -> io::Result<Option<ExitStatus>> {
        let status = self.inner.try_wait()?;
        if status.is_some() {
            self.reaped = true;
        }
        Ok(status)
    }

    /// On Unix this is SIGKILL; on Windows it is TerminateProcess.
    fn kill(&mut self) {
        if self.reaped {
            return;
        }
        let _ = self.inner.kill();
        let _ = self.inner.wait();
        self.reaped = true;
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        self.kill();
    }
}
