//! Handlers for uploaded videos: public URL lookup, listing and deletion.

use axum::extract::{Path, State};
use axum::Json;
use reelcast_db::models::video::VideoRecord;
use serde::Serialize;

use crate::error::AppResult;
use crate::state::AppState;

/// Response for `GET /video/{filename}`. `url` is `null` on failure.
#[derive(Debug, Serialize)]
pub struct VideoUrlResponse {
    pub success: bool,
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VideoListResponse {
    pub videos: Vec<VideoRecord>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct DeleteVideoResponse {
    pub success: bool,
    pub message: String,
}

/// GET /video/{filename}
///
/// Always answers 200; lookup failures are reported in the body.
pub async fn get_video_url(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Json<VideoUrlResponse> {
    let response = match state.storage.public_url(&filename).await {
        Ok(url) => VideoUrlResponse {
            success: true,
            url: Some(url),
            error: None,
        },
        Err(e) => {
            tracing::warn!(filename = %filename, error = %e, "Public URL lookup failed");
            VideoUrlResponse {
                success: false,
                url: None,
                error: Some(e.to_string()),
            }
        }
    };

    Json(response)
}

/// GET /videos
///
/// Every cataloged video, newest first.
pub async fn list_videos(State(state): State<AppState>) -> AppResult<Json<VideoListResponse>> {
    let videos = state.catalog.list_recent().await?;
    let count = videos.len();
    Ok(Json(VideoListResponse { videos, count }))
}

/// DELETE /video/{filename}/delete
///
/// Removes the stored object first, then its catalog rows.
pub async fn delete_video(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> AppResult<Json<DeleteVideoResponse>> {
    state.storage.remove(std::slice::from_ref(&filename)).await?;
    let rows = state.catalog.delete_by_filename(&filename).await?;
    tracing::info!(filename = %filename, rows, "Video deleted");

    Ok(Json(DeleteVideoResponse {
        success: true,
        message: format!("Video {filename} deleted successfully"),
    }))
}
