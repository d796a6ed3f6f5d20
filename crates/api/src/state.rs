use std::sync::Arc;

use reelcast_core::rendering::VideoRenderer;
use reelcast_core::storage::ObjectStorage;
use reelcast_db::VideoCatalog;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// The external collaborators sit behind trait objects so tests can inject
/// fakes. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Turns scripts into video files.
    pub renderer: Arc<dyn VideoRenderer>,
    /// Bucket receiving rendered videos.
    pub storage: Arc<dyn ObjectStorage>,
    /// Video metadata table.
    pub catalog: Arc<dyn VideoCatalog>,
}
