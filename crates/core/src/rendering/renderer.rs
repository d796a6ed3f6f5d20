//! Renderer interface and shared types.
//!
//! Defines [`VideoRenderer`], the seam between the render pipeline and the
//! external command-line renderer, along with [`RenderJob`] and
//! [`RenderError`].

use std::path::PathBuf;

use async_trait::async_trait;

/// Everything a renderer needs to produce one video.
#[derive(Debug, Clone)]
pub struct RenderJob {
    /// Script text, written verbatim to `<stem>.py`.
    pub script: String,
    /// Filename stem shared by the script, the video and the uploaded object.
    pub stem: String,
    /// Directory the renderer runs in and writes into.
    pub work_dir: PathBuf,
}

/// Errors that can occur while rendering.
///
/// The display strings are reported to API callers verbatim.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The renderer exited with a non-zero code.
    #[error("Manim rendering failed: {stderr}")]
    Failed {
        exit_code: i32,
        stderr: String,
    },

    /// The renderer succeeded but no matching video file exists.
    #[error("Video file was not generated despite successful command execution")]
    NotGenerated,

    /// The renderer outlived its timeout and was killed.
    #[error("Manim rendering timed out ({secs} seconds)")]
    TimedOut { secs: u64 },

    /// Writing the script, spawning the process or walking the output tree failed.
    #[error("Error rendering video: {0}")]
    Io(#[from] std::io::Error),
}

/// Turns a script into a video file on local disk.
#[async_trait]
pub trait VideoRenderer: Send + Sync + 'static {
    /// Render `job` and return the path of the produced video.
    async fn render(&self, job: &RenderJob) -> Result<PathBuf, RenderError>;
}
