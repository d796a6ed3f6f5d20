use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use reelcast_core::error::CoreError;
use reelcast_core::rendering::RenderError;
use reelcast_core::storage::StorageError;
use reelcast_db::CatalogError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps the domain errors of the workspace crates and adds HTTP-specific
/// variants. Implements [`IntoResponse`] to produce `{ "error", "code" }`
/// JSON bodies. Failures of external collaborators are reported with their
/// full message so callers can tell a renderer crash from a storage outage.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `reelcast_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The renderer failed; nothing was uploaded.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// An object storage call failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A catalog (database) call failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(CoreError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Render(err) => {
                tracing::error!(error = %err, "Render failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "RENDER_FAILED", err.to_string())
            }
            AppError::Storage(err) => {
                tracing::error!(error = %err, "Storage error");
                (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR", err.to_string())
            }
            AppError::Catalog(err) => {
                tracing::error!(error = %err, "Catalog error");
                (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR", err.to_string())
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg.clone())
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
