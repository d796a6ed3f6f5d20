use axum::routing::post;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Script submission routes.
///
/// ```text
/// POST   /render-video
/// POST   /validate-script
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/render-video", post(handlers::render::render_video))
        .route("/validate-script", post(handlers::scripts::validate_script))
}
