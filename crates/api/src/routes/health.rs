use axum::extract::State;
use axum::{routing::get, Json, Router};
use chrono::Utc;
use reelcast_core::types::Timestamp;
use serde::Serialize;

use crate::handlers;
use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Always `healthy` while the process serves requests.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    pub timestamp: Timestamp,
    /// Whether both Supabase URL and key are set.
    pub supabase_configured: bool,
    /// Truncated project URL, `null` when unset.
    pub supabase_url: Option<String>,
    pub bucket_name: String,
}

/// GET /health -- reports configuration without calling Supabase.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let supabase = &state.config.supabase;

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: Utc::now(),
        supabase_configured: supabase.is_configured(),
        supabase_url: supabase.redacted_url(),
        bucket_name: state.storage.bucket().to_string(),
    })
}

/// Mount health and connectivity routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/test-supabase", get(handlers::diagnostics::test_supabase))
}
