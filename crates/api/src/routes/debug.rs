use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Mounted only when `DEBUG_ROUTES` is set.
pub fn router() -> Router<AppState> {
    Router::new().route("/debug/files", get(handlers::diagnostics::debug_files))
}
