//! Handler for `POST /render-video`.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use reelcast_core::error::CoreError;
use reelcast_core::naming;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::pipeline::{RenderPipeline, RenderReport};
use crate::state::AppState;

pub const SCRIPT_REQUIRED: &str = "Script is required";

#[derive(Debug, Deserialize)]
pub struct RenderVideoRequest {
    #[serde(default)]
    pub script: String,
    /// Optional filename prefix; a random suffix is always appended.
    #[serde(default)]
    pub filename: Option<String>,
}

/// Read a JSON body, mapping malformed input to a 400.
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    payload
        .map(|Json(input)| input)
        .map_err(|e| AppError::BadRequest(e.body_text()))
}

/// POST /render-video
///
/// Renders the script, uploads the video and records it. The work runs on
/// its own task so a dropped connection does not abort it half way.
pub async fn render_video(
    State(state): State<AppState>,
    payload: Result<Json<RenderVideoRequest>, JsonRejection>,
) -> AppResult<Json<RenderReport>> {
    let input = json_body(payload)?;
    if input.script.is_empty() {
        return Err(CoreError::Validation(SCRIPT_REQUIRED.into()).into());
    }

    let stem = naming::video_stem(input.filename.as_deref());
    tracing::info!(stem = %stem, bytes = input.script.len(), "Render requested");

    let pipeline = RenderPipeline::from_state(&state);
    let report = tokio::spawn(async move { pipeline.run(input.script, stem).await })
        .await
        .map_err(|e| AppError::InternalError(format!("Render task failed: {e}")))??;

    Ok(Json(report))
}
