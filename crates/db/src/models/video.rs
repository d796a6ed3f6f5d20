//! Rendered video metadata (`manim_videos` table).

use reelcast_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One uploaded render.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct VideoRecord {
    pub id: DbId,
    /// Object name in the storage bucket (`<stem>.mp4`).
    pub filename: String,
    pub public_url: String,
    /// The script the video was rendered from.
    pub script_content: String,
    /// Render duration in seconds.
    pub render_time: f64,
    pub created_at: Timestamp,
}

/// DTO for inserting a new video record.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateVideoRecord {
    pub filename: String,
    pub public_url: String,
    pub script_content: String,
    pub render_time: f64,
}
