//! Render, upload and catalog a single script.
//!
//! [`RenderPipeline::run`] owns the lifecycle of one request's work
//! directory:
//!
//! - render failure: directory removed, error returned, nothing uploaded
//! - upload failure: artifact kept on disk and reported in the result
//! - upload success: metadata recorded (failures downgrade to a warning),
//!   directory removed

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use reelcast_core::naming;
use reelcast_core::rendering::{RenderError, RenderJob, VideoRenderer};
use reelcast_core::storage::{self, ObjectStorage};
use reelcast_core::types::Timestamp;
use reelcast_core::workdir;
use reelcast_db::models::video::CreateVideoRecord;
use reelcast_db::VideoCatalog;
use serde::Serialize;

use crate::state::AppState;

pub const UPLOADED_MESSAGE: &str = "Video rendered and uploaded successfully";
pub const UPLOAD_FAILED_MESSAGE: &str = "Video rendered but upload failed";

/// Outcome of a render whose video was produced.
///
/// Optional fields are omitted from JSON when unset; which ones appear
/// depends on whether the upload succeeded.
#[derive(Debug, Clone, Serialize)]
pub struct RenderReport {
    pub success: bool,
    pub video_filename: String,
    pub local_video_path: String,
    /// Seconds from work directory creation to a finished render.
    pub render_time: f64,
    pub timestamp: Timestamp,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_video_filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleanup_success: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleanup_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata_warning: Option<String>,
}

/// The collaborators one render needs, detached from the request.
#[derive(Clone)]
pub struct RenderPipeline {
    renderer: Arc<dyn VideoRenderer>,
    storage: Arc<dyn ObjectStorage>,
    catalog: Arc<dyn VideoCatalog>,
    work_root: PathBuf,
}

impl RenderPipeline {
    pub fn from_state(state: &AppState) -> Self {
        Self {
            renderer: Arc::clone(&state.renderer),
            storage: Arc::clone(&state.storage),
            catalog: Arc::clone(&state.catalog),
            work_root: state.config.render.work_root.clone(),
        }
    }

    /// Render `script` under `stem`, then upload and catalog the video.
    ///
    /// Only a render failure is an `Err`. Storage and catalog failures are
    /// folded into the returned report.
    pub async fn run(&self, script: String, stem: String) -> Result<RenderReport, RenderError> {
        let started = Instant::now();
        let work_dir = workdir::create_work_dir(&self.work_root).await?;

        let job = RenderJob {
            script,
            stem,
            work_dir,
        };

        let video_path = match self.renderer.render(&job).await {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!(stem = %job.stem, error = %e, "Render failed");
                discard(&job.work_dir).await;
                return Err(e);
            }
        };

        let render_time = started.elapsed().as_secs_f64();
        let video_filename = naming::video_filename(&job.stem);
        tracing::info!(
            stem = %job.stem,
            path = %video_path.display(),
            render_time,
            "Render finished",
        );

        let mut report = RenderReport {
            success: true,
            video_filename: video_filename.clone(),
            local_video_path: video_path.display().to_string(),
            render_time,
            timestamp: Utc::now(),
            message: UPLOADED_MESSAGE,
            public_url: None,
            upload_error: None,
            local_video_filename: None,
            cleanup_success: None,
            cleanup_error: None,
            metadata_warning: None,
        };

        let public_url =
            match storage::upload_file(self.storage.as_ref(), &video_path, &video_filename).await {
                Ok(url) => url,
                Err(e) => {
                    tracing::warn!(
                        stem = %job.stem,
                        path = %video_path.display(),
                        error = %e,
                        "Upload failed, keeping local artifact",
                    );
                    report.message = UPLOAD_FAILED_MESSAGE;
                    report.upload_error = Some(e.to_string());
                    report.local_video_filename = file_name(&video_path);
                    return Ok(report);
                }
            };

        let record = CreateVideoRecord {
            filename: video_filename,
            public_url: public_url.clone(),
            script_content: job.script.clone(),
            render_time,
        };
        if let Err(e) = self.catalog.insert(&record).await {
            tracing::warn!(stem = %job.stem, error = %e, "Metadata save failed");
            report.metadata_warning = Some(format!("Metadata save failed: {e}"));
        }
        report.public_url = Some(public_url);

        match workdir::remove_work_dir(&job.work_dir).await {
            Ok(()) => report.cleanup_success = Some(true),
            Err(e) => {
                tracing::warn!(path = %job.work_dir.display(), error = %e, "Cleanup failed");
                report.cleanup_error = Some(e.to_string());
            }
        }

        Ok(report)
    }
}

async fn discard(dir: &Path) {
    if let Err(e) = workdir::remove_work_dir(dir).await {
        tracing::warn!(path = %dir.display(), error = %e, "Failed to remove work directory");
    }
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
}
