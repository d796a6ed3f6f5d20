//! Connectivity probe and work directory listing.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use reelcast_core::workdir::{self, FileEntry};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ConnectivityReport {
    pub success: bool,
    pub bucket_accessible: bool,
    pub files_in_bucket: usize,
    pub database_accessible: bool,
    pub videos_in_db: i64,
}

#[derive(Debug, Serialize)]
pub struct ConnectivityFailure {
    pub success: bool,
    pub error: String,
    pub supabase_url: Option<String>,
    pub bucket_name: String,
}

#[derive(Debug, Serialize)]
pub struct FileListing {
    pub files: Vec<FileEntry>,
    pub count: usize,
    pub directory: String,
}

/// GET /test-supabase
///
/// Lists the bucket and counts catalog rows. The first failing call ends
/// the probe with a 500.
pub async fn test_supabase(
    State(state): State<AppState>,
) -> Result<Json<ConnectivityReport>, (StatusCode, Json<ConnectivityFailure>)> {
    let probe = async {
        let files = state.storage.list().await.map_err(|e| e.to_string())?;
        let videos_in_db = state.catalog.count().await.map_err(|e| e.to_string())?;
        Ok::<_, String>((files.len(), videos_in_db))
    };

    match probe.await {
        Ok((files_in_bucket, videos_in_db)) => Ok(Json(ConnectivityReport {
            success: true,
            bucket_accessible: true,
            files_in_bucket,
            database_accessible: true,
            videos_in_db,
        })),
        Err(error) => {
            tracing::error!(error = %error, "Supabase connectivity check failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ConnectivityFailure {
                    success: false,
                    error,
                    supabase_url: state.config.supabase.redacted_url(),
                    bucket_name: state.storage.bucket().to_string(),
                }),
            ))
        }
    }
}

/// GET /debug/files
pub async fn debug_files(State(state): State<AppState>) -> AppResult<Json<FileListing>> {
    let root = &state.config.render.work_root;
    let files = workdir::list_files(root)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to list files: {e}")))?;

    Ok(Json(FileListing {
        count: files.len(),
        files,
        directory: root.display().to_string(),
    }))
}
