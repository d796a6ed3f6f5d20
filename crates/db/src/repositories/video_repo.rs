//! Repository for the `manim_videos` table.

use sqlx::PgPool;

use crate::models::video::{CreateVideoRecord, VideoRecord};

/// Column list for `manim_videos` SELECT queries.
const COLUMNS: &str = "id, filename, public_url, script_content, render_time, created_at";

/// Provides insert, list and delete operations for video metadata.
pub struct VideoRepo;

impl VideoRepo {
    /// Insert a new record, returning the stored row.
    pub async fn create(pool: &PgPool, dto: &CreateVideoRecord) -> Result<VideoRecord, sqlx::Error> {
        let query = format!(
            "INSERT INTO manim_videos (filename, public_url, script_content, render_time) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );

        sqlx::query_as::<_, VideoRecord>(&query)
            .bind(&dto.filename)
            .bind(&dto.public_url)
            .bind(&dto.script_content)
            .bind(dto.render_time)
            .fetch_one(pool)
            .await
    }

    /// List every record, newest first.
    pub async fn list_recent(pool: &PgPool) -> Result<Vec<VideoRecord>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM manim_videos ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, VideoRecord>(&query).fetch_all(pool).await
    }

    /// Delete every record with the given filename. Returns the number of rows removed.
    pub async fn delete_by_filename(pool: &PgPool, filename: &str) -> Result<u64, sqlx::Error> {
        let rows = sqlx::query("DELETE FROM manim_videos WHERE filename = $1")
            .bind(filename)
            .execute(pool)
            .await?
            .rows_affected();

        Ok(rows)
    }

    /// Count all records.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM manim_videos")
            .fetch_one(pool)
            .await
    }
}
