pub mod debug;
pub mod health;
pub mod render;
pub mod videos;

use axum::Router;

use crate::state::AppState;

/// Build the route tree. All paths are root-level.
///
/// ```text
/// /health                          GET     service status
/// /test-supabase                   GET     storage + database probe
/// /render-video                    POST    render, upload, catalog
/// /validate-script                 POST    marker check
/// /videos                          GET     cataloged videos
/// /video/{filename}                GET     public URL
/// /video/{filename}/delete         DELETE  remove object + rows
/// /debug/files                     GET     work root listing (opt-in)
/// ```
pub fn app_routes(debug_routes: bool) -> Router<AppState> {
    let router = Router::new()
        .merge(health::router())
        .merge(render::router())
        .merge(videos::router());

    if debug_routes {
        router.merge(debug::router())
    } else {
        router
    }
}
