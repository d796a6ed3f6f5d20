//! Object storage seam and the artifact upload contract.
//!
//! [`ObjectStorage`] is implemented by `reelcast-cloud` (Supabase Storage
//! and an in-memory store). [`upload_file`] is the only way the render
//! pipeline pushes an artifact: it checks the local file, uploads it with
//! overwrite allowed and resolves the public URL.

use std::io;
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Content type of every uploaded artifact.
pub const VIDEO_CONTENT_TYPE: &str = "video/mp4";

/// Bucket used when none is configured.
pub const DEFAULT_BUCKET: &str = "manim-videos";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Proof that an upload was stored.
///
/// An upload only counts as successful when the service names the key it
/// stored the object under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub key: String,
}

/// One object in a bucket listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredObject {
    pub name: String,
    pub size: Option<u64>,
    pub updated_at: Option<String>,
}

/// Errors from object storage operations.
///
/// The display strings are reported to API callers verbatim.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The local file to upload does not exist.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// The local file to upload has zero length.
    #[error("File is empty: {0}")]
    EmptyFile(String),

    /// The local file could not be read.
    #[error("Error reading file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    /// No storage credentials were configured.
    #[error("Storage is not configured: {0}")]
    NotConfigured(String),

    /// The request never produced a response (network, DNS, TLS, ...).
    #[error("Storage request failed: {0}")]
    Request(String),

    /// The service answered with a non-2xx status.
    #[error("Storage API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The service answered 2xx without naming the stored key.
    #[error("Upload failed - Unexpected response: {0}")]
    UnexpectedResponse(String),
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// A bucket of objects addressed by name.
#[async_trait]
pub trait ObjectStorage: Send + Sync + 'static {
    /// Name of the bucket this client writes into.
    fn bucket(&self) -> &str;

    /// Store `bytes` under `name`, replacing any existing object.
    async fn upload(
        &self,
        name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<UploadReceipt, StorageError>;

    /// Public URL under which `name` can be fetched.
    async fn public_url(&self, name: &str) -> Result<String, StorageError>;

    /// List the objects at the root of the bucket.
    async fn list(&self) -> Result<Vec<StoredObject>, StorageError>;

    /// Remove the named objects. Missing names are not an error.
    async fn remove(&self, names: &[String]) -> Result<(), StorageError>;
}

// ---------------------------------------------------------------------------
// Upload
// ---------------------------------------------------------------------------

/// Upload the local file at `path` as `remote_name` and return its public URL.
///
/// The file must exist and be non-empty; it is read fully into memory.
pub async fn upload_file(
    storage: &dyn ObjectStorage,
    path: &Path,
    remote_name: &str,
) -> Result<String, StorageError> {
    let shown = path.display().to_string();

    let metadata = match fs::metadata(path).await {
        Ok(m) if m.is_file() => m,
        Ok(_) => return Err(StorageError::FileNotFound(shown)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(StorageError::FileNotFound(shown))
        }
        Err(source) => {
            return Err(StorageError::Read {
                path: shown,
                source,
            })
        }
    };

    if metadata.len() == 0 {
        return Err(StorageError::EmptyFile(shown));
    }

    let bytes = fs::read(path).await.map_err(|source| StorageError::Read {
        path: shown.clone(),
        source,
    })?;

    tracing::debug!(path = %shown, bytes = bytes.len(), bucket = storage.bucket(), "Uploading artifact");
    let receipt = storage
        .upload(remote_name, bytes, VIDEO_CONTENT_TYPE)
        .await?;

    let url = storage.public_url(remote_name).await?;
    tracing::info!(key = %receipt.key, %url, "Upload successful");
    Ok(url)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
