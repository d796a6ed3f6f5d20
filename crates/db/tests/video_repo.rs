//! Integration tests for `VideoRepo` and `PgVideoCatalog` against Postgres.

use assert_matches::assert_matches;
use reelcast_db::models::video::CreateVideoRecord;
use reelcast_db::repositories::VideoRepo;
use reelcast_db::{PgVideoCatalog, VideoCatalog};
use sqlx::PgPool;

fn dto(filename: &str, render_time: f64) -> CreateVideoRecord {
    CreateVideoRecord {
        filename: filename.to_string(),
        public_url: format!("https://example.supabase.co/storage/v1/object/public/manim-videos/{filename}"),
        script_content: "class A(Scene):\n    def construct(self):\n        pass".to_string(),
        render_time,
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn health_check_passes(pool: PgPool) {
    reelcast_db::health_check(&pool).await.unwrap();
}

#[sqlx::test(migrations = "./migrations")]
async fn create_returns_stored_row(pool: PgPool) {
    let record = VideoRepo::create(&pool, &dto("intro_1a2b3c4d.mp4", 12.25))
        .await
        .unwrap();

    assert!(record.id > 0);
    assert_eq!(record.filename, "intro_1a2b3c4d.mp4");
    assert!(record.public_url.ends_with("/intro_1a2b3c4d.mp4"));
    assert_eq!(record.render_time, 12.25);
}

#[sqlx::test(migrations = "./migrations")]
async fn list_recent_orders_newest_first(pool: PgPool) {
    VideoRepo::create(&pool, &dto("first.mp4", 1.0)).await.unwrap();
    VideoRepo::create(&pool, &dto("second.mp4", 2.0)).await.unwrap();

    let rows = VideoRepo::list_recent(&pool).await.unwrap();
    let names: Vec<&str> = rows.iter().map(|r| r.filename.as_str()).collect();
    assert_eq!(names, ["second.mp4", "first.mp4"]);
}

#[sqlx::test(migrations = "./migrations")]
async fn delete_by_filename_reports_rows(pool: PgPool) {
    VideoRepo::create(&pool, &dto("gone.mp4", 1.0)).await.unwrap();
    VideoRepo::create(&pool, &dto("kept.mp4", 1.0)).await.unwrap();

    assert_eq!(VideoRepo::delete_by_filename(&pool, "gone.mp4").await.unwrap(), 1);
    assert_eq!(VideoRepo::delete_by_filename(&pool, "gone.mp4").await.unwrap(), 0);
    assert_eq!(VideoRepo::count(&pool).await.unwrap(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn catalog_wraps_repository(pool: PgPool) {
    let catalog = PgVideoCatalog::new(pool);

    let inserted = catalog.insert(&dto("cat.mp4", 3.5)).await.unwrap();
    assert_eq!(catalog.count().await.unwrap(), 1);

    let listed = catalog.list_recent().await.unwrap();
    assert_matches!(listed.as_slice(), [only] if only.id == inserted.id);
}
