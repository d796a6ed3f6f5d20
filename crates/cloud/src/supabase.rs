//! Supabase Storage REST client.
//!
//! Wraps the storage endpoints the service needs (upload, list, remove)
//! using [`reqwest`]. Public URLs are derived locally, matching the
//! `/object/public/` route Supabase serves for public buckets.

use async_trait::async_trait;
use reelcast_core::storage::{ObjectStorage, StorageError, StoredObject, UploadReceipt};
use reqwest::Url;
use serde::Deserialize;

use crate::config::SupabaseConfig;

/// Page size used when listing a bucket.
const LIST_LIMIT: u32 = 1000;

/// Body of a successful `POST /object/{bucket}/{name}`.
#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(rename = "Key")]
    key: Option<String>,
}

/// One entry of `POST /object/list/{bucket}`.
#[derive(Debug, Deserialize)]
struct ListedObject {
    name: String,
    updated_at: Option<String>,
    metadata: Option<ListedMetadata>,
}

#[derive(Debug, Deserialize)]
struct ListedMetadata {
    size: Option<u64>,
}

/// [`ObjectStorage`] backed by a Supabase project.
pub struct SupabaseStorage {
    client: reqwest::Client,
    config: SupabaseConfig,
}

impl SupabaseStorage {
    pub fn new(config: SupabaseConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Create a storage client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: SupabaseConfig) -> Self {
        Self { client, config }
    }

    // ---- private helpers ----

    /// Project URL and API key, or `NotConfigured`.
    fn credentials(&self) -> Result<(&str, &str), StorageError> {
        match (&self.config.url, &self.config.anon_key) {
            (Some(url), Some(key)) => Ok((url.as_str(), key.as_str())),
            _ => Err(StorageError::NotConfigured(
                "SUPABASE_URL and SUPABASE_ANON_KEY must be set".to_string(),
            )),
        }
    }

    /// `{project}/storage/v1/object/{segments...}` with every segment
    /// percent-encoded.
    fn object_endpoint(&self, segments: &[&str]) -> Result<Url, StorageError> {
        let (base, _) = self.credentials()?;
        let mut url = Url::parse(base)
            .map_err(|e| StorageError::NotConfigured(format!("invalid SUPABASE_URL '{base}': {e}")))?;

        url.path_segments_mut()
            .map_err(|()| StorageError::NotConfigured(format!("SUPABASE_URL '{base}' cannot be a base")))?
            .pop_if_empty()
            .extend(["storage", "v1", "object"])
            .extend(segments);
        Ok(url)
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::RequestBuilder, StorageError> {
        let (_, key) = self.credentials()?;
        Ok(builder.bearer_auth(key).header("apikey", key))
    }

    async fn send(builder: reqwest::RequestBuilder) -> Result<String, StorageError> {
        let response = builder
            .send()
            .await
            .map_err(|e| StorageError::Request(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());

        if !status.is_success() {
            return Err(StorageError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}

#[async_trait]
impl ObjectStorage for SupabaseStorage {
    fn bucket(&self) -> &str {
        &self.config.bucket
    }

    async fn upload(
        &self,
        name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<UploadReceipt, StorageError> {
        let url = self.object_endpoint(&[self.config.bucket.as_str(), name])?;
        let request = self
            .authorized(self.client.post(url))?
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .header("x-upsert", "true")
            .body(bytes);

        let body = Self::send(request).await?;
        tracing::debug!(name, response = %body, "Supabase upload response");

        match serde_json::from_str::<UploadResponse>(&body) {
            Ok(UploadResponse { key: Some(key) }) => Ok(UploadReceipt { key }),
            _ => Err(StorageError::UnexpectedResponse(body)),
        }
    }

    async fn public_url(&self, name: &str) -> Result<String, StorageError> {
        let url = self.object_endpoint(&["public", self.config.bucket.as_str(), name])?;
        Ok(url.to_string())
    }

    async fn list(&self) -> Result<Vec<StoredObject>, StorageError> {
        let url = self.object_endpoint(&["list", self.config.bucket.as_str()])?;
        let request = self.authorized(self.client.post(url))?.json(&serde_json::json!({
            "prefix": "",
            "limit": LIST_LIMIT,
            "offset": 0,
            "sortBy": { "column": "name", "order": "asc" },
        }));

        let body = Self::send(request).await?;
        let listed: Vec<ListedObject> = serde_json::from_str(&body)
            .map_err(|_| StorageError::UnexpectedResponse(body.clone()))?;

        Ok(listed
            .into_iter()
            .map(|o| StoredObject {
                name: o.name,
                size: o.metadata.and_then(|m| m.size),
                updated_at: o.updated_at,
            })
            .collect())
    }

    async fn remove(&self, names: &[String]) -> Result<(), StorageError> {
        let url = self.object_endpoint(&[self.config.bucket.as_str()])?;
        let request = self
            .authorized(self.client.delete(url))?
            .json(&serde_json::json!({ "prefixes": names }));

        Self::send(request).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage(url: Option<&str>) -> SupabaseStorage {
        SupabaseStorage::new(SupabaseConfig {
            url: url.map(str::to_string),
            anon_key: Some("anon".to_string()),
            bucket: "manim-videos".to_string(),
        })
    }

    #[tokio::test]
    async fn public_url_points_at_public_route() {
        let url = storage(Some("https://abc.supabase.co"))
            .public_url("clip_1234.mp4")
            .await
            .unwrap();
        assert_eq!(
            url,
            "https://abc.supabase.co/storage/v1/object/public/manim-videos/clip_1234.mp4"
        );
    }

    #[tokio::test]
    async fn trailing_slash_in_project_url_is_ignored() {
        let url = storage(Some("https://abc.supabase.co/"))
            .public_url("a.mp4")
            .await
            .unwrap();
        assert_eq!(
            url,
            "https://abc.supabase.co/storage/v1/object/public/manim-videos/a.mp4"
        );
    }

    #[tokio::test]
    async fn object_names_are_percent_encoded() {
        let url = storage(Some("https://abc.supabase.co"))
            .public_url("my clip/../x.mp4")
            .await
            .unwrap();
        assert!(url.contains("/manim-videos/my%20clip%2F..%2Fx.mp4"), "{url}");
    }

    #[tokio::test]
    async fn missing_credentials_are_reported() {
        let err = storage(None).public_url("a.mp4").await.unwrap_err();
        assert!(matches!(err, StorageError::NotConfigured(_)));

        let err = storage(None)
            .upload("a.mp4", vec![1], "video/mp4")
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotConfigured(_)));
    }

    #[tokio::test]
    async fn invalid_project_url_is_reported() {
        let err = storage(Some("not a url")).public_url("a.mp4").await.unwrap_err();
        assert!(matches!(err, StorageError::NotConfigured(_)));
    }
}
