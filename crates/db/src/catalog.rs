//! Video metadata catalog seam.
//!
//! The API layer records and lists uploads through [`VideoCatalog`] so
//! tests and local runs can substitute [`InMemoryVideoCatalog`] for the
//! Postgres-backed [`PgVideoCatalog`].

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::models::video::{CreateVideoRecord, VideoRecord};
use crate::repositories::VideoRepo;
use crate::DbPool;

/// Errors from catalog operations.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Catalog unavailable: {0}")]
    Unavailable(String),
}

/// Storage for [`VideoRecord`]s.
#[async_trait]
pub trait VideoCatalog: Send + Sync + 'static {
    /// Insert one record and return it as stored.
    async fn insert(&self, dto: &CreateVideoRecord) -> Result<VideoRecord, CatalogError>;

    /// All records, newest first.
    async fn list_recent(&self) -> Result<Vec<VideoRecord>, CatalogError>;

    /// Remove every record with `filename`. Returns how many were removed.
    async fn delete_by_filename(&self, filename: &str) -> Result<u64, CatalogError>;

    /// Number of records.
    async fn count(&self) -> Result<i64, CatalogError>;
}

// ---------------------------------------------------------------------------
// Postgres
// ---------------------------------------------------------------------------

/// [`VideoCatalog`] backed by the `manim_videos` table.
#[derive(Debug, Clone)]
pub struct PgVideoCatalog {
    pool: DbPool,
}

impl PgVideoCatalog {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VideoCatalog for PgVideoCatalog {
    async fn insert(&self, dto: &CreateVideoRecord) -> Result<VideoRecord, CatalogError> {
        let record = VideoRepo::create(&self.pool, dto).await?;
        tracing::debug!(id = record.id, filename = %record.filename, "Video record inserted");
        Ok(record)
    }

    async fn list_recent(&self) -> Result<Vec<VideoRecord>, CatalogError> {
        Ok(VideoRepo::list_recent(&self.pool).await?)
    }

    async fn delete_by_filename(&self, filename: &str) -> Result<u64, CatalogError> {
        let removed = VideoRepo::delete_by_filename(&self.pool, filename).await?;
        tracing::debug!(filename, removed, "Video records deleted");
        Ok(removed)
    }

    async fn count(&self) -> Result<i64, CatalogError> {
        Ok(VideoRepo::count(&self.pool).await?)
    }
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

/// Process-local [`VideoCatalog`]. Records are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryVideoCatalog {
    rows: RwLock<Vec<VideoRecord>>,
}

impl InMemoryVideoCatalog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VideoCatalog for InMemoryVideoCatalog {
    async fn insert(&self, dto: &CreateVideoRecord) -> Result<VideoRecord, CatalogError> {
        let mut rows = self.rows.write().await;
        let id = rows.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        let record = VideoRecord {
            id,
            filename: dto.filename.clone(),
            public_url: dto.public_url.clone(),
            script_content: dto.script_content.clone(),
            render_time: dto.render_time,
            created_at: Utc::now(),
        };
        rows.push(record.clone());
        Ok(record)
    }

    async fn list_recent(&self) -> Result<Vec<VideoRecord>, CatalogError> {
        let mut rows = self.rows.read().await.clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn delete_by_filename(&self, filename: &str) -> Result<u64, CatalogError> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|r| r.filename != filename);
        Ok((before - rows.len()) as u64)
    }

    async fn count(&self) -> Result<i64, CatalogError> {
        Ok(self.rows.read().await.len() as i64)
    }
}
