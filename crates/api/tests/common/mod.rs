#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use reelcast_api::config::{RenderConfig, ServerConfig};
use reelcast_api::router::build_app_router;
use reelcast_api::state::AppState;
use reelcast_cloud::{InMemoryStorage, SupabaseConfig};
use reelcast_core::naming;
use reelcast_core::rendering::{RenderError, RenderJob, VideoRenderer};
use reelcast_core::storage::{ObjectStorage, StorageError, StoredObject, UploadReceipt};
use reelcast_db::models::video::{CreateVideoRecord, VideoRecord};
use reelcast_db::{CatalogError, InMemoryVideoCatalog, VideoCatalog};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

pub const BUCKET: &str = "manim-videos";
pub const PUBLIC_BASE: &str = "https://test-project.supabase.co/storage/v1/object/public";

pub const SCENE: &str = "class MyScene(Scene):\n    def construct(self):\n        pass";

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

/// How a [`FakeRenderer`] behaves.
#[derive(Debug, Clone, Copy)]
pub enum RenderOutcome {
    /// Write a small video under the usual media layout.
    Video,
    /// Write a zero-byte video, which the upload step rejects.
    EmptyVideo,
    /// Exit non-zero with a stderr message.
    Fail,
}

/// Renderer that writes files like the real one without running anything.
pub struct FakeRenderer {
    outcome: RenderOutcome,
    calls: AtomicUsize,
}

impl FakeRenderer {
    pub fn new(outcome: RenderOutcome) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VideoRenderer for FakeRenderer {
    async fn render(&self, job: &RenderJob) -> Result<PathBuf, RenderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::fs::write(job.work_dir.join(naming::script_filename(&job.stem)), &job.script).await?;

        let bytes: &[u8] = match self.outcome {
            RenderOutcome::Fail => {
                return Err(RenderError::Failed {
                    exit_code: 1,
                    stderr: "NameError: name 'Circl' is not defined".to_string(),
                })
            }
            RenderOutcome::EmptyVideo => b"",
            RenderOutcome::Video => b"\x00\x00\x00\x18ftypmp42 fake video",
        };

        let out_dir = job
            .work_dir
            .join("media")
            .join("videos")
            .join(&job.stem)
            .join("480p15");
        tokio::fs::create_dir_all(&out_dir).await?;
        let video = out_dir.join(naming::video_filename(&job.stem));
        tokio::fs::write(&video, bytes).await?;
        Ok(video)
    }
}

/// Storage whose every call fails, counting attempts.
#[derive(Default)]
pub struct FailingStorage {
    calls: AtomicUsize,
}

impl FailingStorage {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn fail(&self) -> StorageError {
        self.calls.fetch_add(1, Ordering::SeqCst);
        StorageError::Api {
            status: 503,
            body: "storage offline".to_string(),
        }
    }
}

#[async_trait]
impl ObjectStorage for FailingStorage {
    fn bucket(&self) -> &str {
        BUCKET
    }

    async fn upload(
        &self,
        _name: &str,
        _bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<UploadReceipt, StorageError> {
        Err(self.fail())
    }

    async fn public_url(&self, _name: &str) -> Result<String, StorageError> {
        Err(self.fail())
    }

    async fn list(&self) -> Result<Vec<StoredObject>, StorageError> {
        Err(self.fail())
    }

    async fn remove(&self, _names: &[String]) -> Result<(), StorageError> {
        Err(self.fail())
    }
}

/// Catalog whose every call fails.
pub struct FailingCatalog;

#[async_trait]
impl VideoCatalog for FailingCatalog {
    async fn insert(&self, _dto: &CreateVideoRecord) -> Result<VideoRecord, CatalogError> {
        Err(CatalogError::Unavailable("connection refused".to_string()))
    }

    async fn list_recent(&self) -> Result<Vec<VideoRecord>, CatalogError> {
        Err(CatalogError::Unavailable("connection refused".to_string()))
    }

    async fn delete_by_filename(&self, _filename: &str) -> Result<u64, CatalogError> {
        Err(CatalogError::Unavailable("connection refused".to_string()))
    }

    async fn count(&self) -> Result<i64, CatalogError> {
        Err(CatalogError::Unavailable("connection refused".to_string()))
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` rendering into `work_root`.
pub fn test_config(work_root: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        render: RenderConfig {
            renderer_bin: "manim".to_string(),
            timeout_secs: 10,
            work_root: work_root.to_path_buf(),
            warm_up: false,
        },
        supabase: SupabaseConfig {
            url: Some("https://test-project.supabase.co".to_string()),
            anon_key: Some("test-anon-key".to_string()),
            bucket: BUCKET.to_string(),
        },
        debug_routes: true,
    }
}

/// A router plus handles to the collaborators behind it.
pub struct TestApp {
    pub router: Router,
    pub renderer: Arc<FakeRenderer>,
    pub storage: Arc<InMemoryStorage>,
    pub catalog: Arc<InMemoryVideoCatalog>,
    pub work_root: TempDir,
}

impl TestApp {
    pub fn work_root(&self) -> &Path {
        self.work_root.path()
    }
}

/// Build the app with a fake renderer, in-memory storage and catalog.
pub fn build_test_app(outcome: RenderOutcome) -> TestApp {
    let work_root = TempDir::new().unwrap();
    let renderer = Arc::new(FakeRenderer::new(outcome));
    let storage = Arc::new(InMemoryStorage::new(BUCKET, PUBLIC_BASE));
    let catalog = Arc::new(InMemoryVideoCatalog::new());

    let router = build_app_with(
        test_config(work_root.path()),
        renderer.clone(),
        storage.clone(),
        catalog.clone(),
    );

    TestApp {
        router,
        renderer,
        storage,
        catalog,
        work_root,
    }
}

/// Build the app from explicit collaborators, using the production
/// middleware stack.
pub fn build_app_with(
    config: ServerConfig,
    renderer: Arc<dyn VideoRenderer>,
    storage: Arc<dyn ObjectStorage>,
    catalog: Arc<dyn VideoCatalog>,
) -> Router {
    let state = AppState {
        config: Arc::new(config.clone()),
        renderer,
        storage,
        catalog,
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
