//! Manim command-line renderer.
//!
//! Runs `manim <stem>.py -ql --output_file <stem>.mp4` inside the job's
//! work directory and locates the produced video afterwards. Manim nests
//! its output under `media/videos/<script>/<quality>/`, so the file is
//! found by walking the tree rather than by a fixed path.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tokio::fs;
use tokio::process::Command;

use super::renderer::{RenderError, RenderJob, VideoRenderer};
use super::subprocess::{self, CommandOutput, SubprocessError};
use crate::naming;
use crate::workdir;

/// Default renderer executable.
pub const DEFAULT_PROGRAM: &str = "manim";

/// Default render timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Low-quality preset flag (480p, 15 fps).
pub const LOW_QUALITY_FLAG: &str = "-ql";

/// Stderr kept in a [`RenderError::Failed`]; earlier output is dropped.
const STDERR_TAIL_BYTES: usize = 64 * 1024;

/// Timeout for the startup warm-up render.
const WARMUP_TIMEOUT: Duration = Duration::from_secs(60);

/// Scene class rendered by the warm-up script.
const WARMUP_SCENE: &str = "InitTest";

const WARMUP_SCRIPT: &str = r#"from manim import *

class InitTest(Scene):
    def construct(self):
        text = Text("Init")
        self.add(text)
"#;

/// How the renderer process is launched.
#[derive(Debug, Clone)]
pub struct RendererSettings {
    /// Executable name or path.
    pub program: String,
    /// Maximum wall-clock time per render.
    pub timeout: Duration,
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// [`VideoRenderer`] backed by the `manim` CLI.
#[derive(Debug, Clone)]
pub struct ManimRenderer {
    settings: RendererSettings,
}

impl ManimRenderer {
    pub fn new(settings: RendererSettings) -> Self {
        Self { settings }
    }

    /// Render a trivial scene once so that the renderer's first-run setup
    /// (font cache, LaTeX probing, ...) is not paid by the first request.
    ///
    /// Runs in a throw-away directory under `work_root` that is removed
    /// afterwards whatever the outcome.
    pub async fn warm_up(&self, work_root: &Path) -> Result<(), RenderError> {
        let dir = workdir::create_work_dir(work_root).await?;
        let result = self.run_warm_up(&dir).await;

        if let Err(e) = workdir::remove_work_dir(&dir).await {
            tracing::warn!(dir = %dir.display(), error = %e, "Failed to remove warm-up directory");
        }
        result
    }

    async fn run_warm_up(&self, dir: &Path) -> Result<(), RenderError> {
        let stem = format!("init_test_{}", naming::random_suffix());
        let script_name = naming::script_filename(&stem);
        fs::write(dir.join(&script_name), WARMUP_SCRIPT).await?;

        let mut cmd = Command::new(&self.settings.program);
        cmd.arg(&script_name)
            .arg(WARMUP_SCENE)
            .arg(LOW_QUALITY_FLAG)
            .arg("--disable_caching")
            .arg("--output_file")
            .arg(naming::video_filename(&stem));

        let output = self.execute(&mut cmd, dir, WARMUP_TIMEOUT).await?;
        tracing::info!(
            exit_code = output.exit_code,
            elapsed_ms = output.duration_ms,
            "Renderer warm-up finished"
        );
        check_exit(output)
    }

    async fn execute(
        &self,
        cmd: &mut Command,
        dir: &Path,
        timeout: Duration,
    ) -> Result<CommandOutput, RenderError> {
        subprocess::run_command(cmd, dir, timeout)
            .await
            .map_err(|e| match e {
                SubprocessError::Timeout { .. } => RenderError::TimedOut {
                    secs: timeout.as_secs(),
                },
                SubprocessError::Io(io) => RenderError::Io(io),
            })
    }
}

impl Default for ManimRenderer {
    fn default() -> Self {
        Self::new(RendererSettings::default())
    }
}

#[async_trait]
impl VideoRenderer for ManimRenderer {
    async fn render(&self, job: &RenderJob) -> Result<PathBuf, RenderError> {
        fs::create_dir_all(&job.work_dir).await?;

        let script_name = naming::script_filename(&job.stem);
        fs::write(job.work_dir.join(&script_name), job.script.as_bytes()).await?;

        let mut cmd = Command::new(&self.settings.program);
        cmd.arg(&script_name)
            .arg(LOW_QUALITY_FLAG)
            .arg("--output_file")
            .arg(naming::video_filename(&job.stem));

        tracing::debug!(stem = %job.stem, dir = %job.work_dir.display(), "Invoking renderer");
        let output = self
            .execute(&mut cmd, &job.work_dir, self.settings.timeout)
            .await
            .inspect_err(|e| tracing::warn!(stem = %job.stem, error = %e, "Renderer did not finish"))?;

        tracing::debug!(
            stem = %job.stem,
            exit_code = output.exit_code,
            elapsed_ms = output.duration_ms,
            "Renderer exited"
        );
        check_exit(output)?;

        workdir::find_artifact(&job.work_dir, &job.stem, naming::VIDEO_EXTENSION)
            .await?
            .ok_or(RenderError::NotGenerated)
    }
}

fn check_exit(output: CommandOutput) -> Result<(), RenderError> {
    if output.success() {
        return Ok(());
    }

    let stderr = stderr_tail(output.stderr);
    tracing::warn!(exit_code = output.exit_code, stderr = %stderr, "Renderer failed");
    Err(RenderError::Failed {
        exit_code: output.exit_code,
        stderr,
    })
}

/// The last [`STDERR_TAIL_BYTES`] of `stderr`, cut on a char boundary.
fn stderr_tail(mut stderr: String) -> String {
    if stderr.len() <= STDERR_TAIL_BYTES {
        return stderr;
    }
    let mut start = stderr.len() - STDERR_TAIL_BYTES;
    while !stderr.is_char_boundary(start) {
        start += 1;
    }
    stderr.split_off(start)
}
