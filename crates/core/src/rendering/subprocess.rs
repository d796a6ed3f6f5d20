//! Subprocess execution with captured output and a hard timeout.
//!
//! [`run_command`] spawns a prepared [`tokio::process::Command`], drains
//! stdout/stderr on separate tasks and kills the child if it outlives the
//! timeout.

use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

/// Maximum stdout or stderr size captured per stream (10 MiB).
///
/// The renderer prints a progress bar per frame; anything past this limit
/// is read and discarded so the child never sees a closed pipe.
const MAX_OUTPUT_BYTES: usize = 10 * 1024 * 1024;

/// Captured result of a finished process.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    /// Process exit code (`-1` if killed by signal).
    pub exit_code: i32,
    pub duration_ms: u64,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Errors raised before a process produced an exit status.
#[derive(Debug, thiserror::Error)]
pub enum SubprocessError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Process timed out after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u64 },
}

/// Spawn `cmd` inside `working_directory`, capture its output and enforce
/// `timeout`.
///
/// The caller sets the program and arguments. Stdin is closed.
pub async fn run_command(
    cmd: &mut Command,
    working_directory: &Path,
    timeout: Duration,
) -> Result<CommandOutput, SubprocessError> {
    // `kill_on_drop(true)` ensures the child is killed when dropped (e.g. on timeout).
    cmd.current_dir(working_directory)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let start = Instant::now();
    let mut child = cmd.spawn()?;

    let stdout_handle = child.stdout.take();
    let stderr_handle = child.stderr.take();
    let stdout_task = tokio::spawn(async move { read_stream(stdout_handle).await });
    let stderr_task = tokio::spawn(async move { read_stream(stderr_handle).await });

    match tokio::time::timeout(timeout, child.wait()).await {
        Ok(Ok(status)) => {
            let duration_ms = start.elapsed().as_millis() as u64;
            let stdout_bytes = stdout_task.await.unwrap_or_default();
            let stderr_bytes = stderr_task.await.unwrap_or_default();

            Ok(CommandOutput {
                stdout: String::from_utf8_lossy(&stdout_bytes).into_owned(),
                stderr: String::from_utf8_lossy(&stderr_bytes).into_owned(),
                exit_code: status.code().unwrap_or(-1),
                duration_ms,
            })
        }
        Ok(Err(e)) => Err(SubprocessError::Io(e)),
        Err(_elapsed) => {
            // `child` is dropped on return, which kills the process.
            stdout_task.abort();
            stderr_task.abort();
            Err(SubprocessError::Timeout {
                elapsed_ms: start.elapsed().as_millis() as u64,
            })
        }
    }
}

/// Read an output stream to EOF, keeping the first [`MAX_OUTPUT_BYTES`].
async fn read_stream<R: AsyncRead + Unpin>(handle: Option<R>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut h) = handle {
        let _ = (&mut h)
            .take(MAX_OUTPUT_BYTES as u64)
            .read_to_end(&mut buf)
            .await;
        let _ = tokio::io::copy(&mut h, &mut tokio::io::sink()).await;
    }
    buf
}
