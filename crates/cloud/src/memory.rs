//! Process-local object storage.

use std::collections::BTreeMap;

use async_trait::async_trait;
use reelcast_core::storage::{ObjectStorage, StorageError, StoredObject, UploadReceipt};
use tokio::sync::RwLock;

/// A stored object's bytes and content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// [`ObjectStorage`] that keeps objects in a map. Uploads always succeed.
#[derive(Debug)]
pub struct InMemoryStorage {
    bucket: String,
    public_base: String,
    objects: RwLock<BTreeMap<String, MemoryObject>>,
}

impl InMemoryStorage {
    /// Public URLs are `{public_base}/{bucket}/{name}`.
    pub fn new(bucket: impl Into<String>, public_base: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            public_base: public_base.into().trim_end_matches('/').to_string(),
            objects: RwLock::new(BTreeMap::new()),
        }
    }

    /// Fetch a stored object.
    pub async fn get(&self, name: &str) -> Option<MemoryObject> {
        self.objects.read().await.get(name).cloned()
    }

    /// Number of stored objects.
    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

#[async_trait]
impl ObjectStorage for InMemoryStorage {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn upload(
        &self,
        name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<UploadReceipt, StorageError> {
        self.objects.write().await.insert(
            name.to_string(),
            MemoryObject {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(UploadReceipt {
            key: format!("{}/{name}", self.bucket),
        })
    }

    async fn public_url(&self, name: &str) -> Result<String, StorageError> {
        Ok(format!("{}/{}/{name}", self.public_base, self.bucket))
    }

    async fn list(&self) -> Result<Vec<StoredObject>, StorageError> {
        Ok(self
            .objects
            .read()
            .await
            .iter()
            .map(|(name, object)| StoredObject {
                name: name.clone(),
                size: Some(object.bytes.len() as u64),
                updated_at: None,
            })
            .collect())
    }

    async fn remove(&self, names: &[String]) -> Result<(), StorageError> {
        let mut objects = self.objects.write().await;
        for name in names {
            objects.remove(name);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn upload_overwrites_and_lists() {
        let storage = InMemoryStorage::new("videos", "http://localhost/public/");

        let receipt = storage.upload("a.mp4", vec![1, 2], "video/mp4").await.unwrap();
        assert_eq!(receipt.key, "videos/a.mp4");
        storage.upload("a.mp4", vec![1, 2, 3], "video/mp4").await.unwrap();

        let listed = storage.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].size, Some(3));
        assert_eq!(
            storage.public_url("a.mp4").await.unwrap(),
            "http://localhost/public/videos/a.mp4"
        );
    }

    #[tokio::test]
    async fn remove_ignores_missing_names() {
        let storage = InMemoryStorage::new("videos", "http://localhost");
        storage.upload("a.mp4", vec![1], "video/mp4").await.unwrap();

        storage
            .remove(&["a.mp4".to_string(), "missing.mp4".to_string()])
            .await
            .unwrap();
        assert!(storage.is_empty().await);
    }
}
