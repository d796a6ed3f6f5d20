use axum::routing::{delete, get};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Uploaded video routes.
///
/// ```text
/// GET    /videos
/// GET    /video/{filename}
/// DELETE /video/{filename}/delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/videos", get(handlers::videos::list_videos))
        .route("/video/{filename}", get(handlers::videos::get_video_url))
        .route(
            "/video/{filename}/delete",
            delete(handlers::videos::delete_video),
        )
}
