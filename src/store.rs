use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use futures_util::{StreamExt, stream::BoxStream};
use object_store::{ObjectStore, PutPayload, aws::AmazonS3Builder, path::Path};
use sha2::{Digest, Sha256};

use crate::{
    config::Config,
    error::{AppError, Result},
    models::ObjectMeta,
};

/// Client for the remote media bucket. Wraps the `object_store` API and
/// translates provider errors into the gateway's error kinds, so callers
/// never see provider-specific codes.
#[derive(Clone)]
pub struct MediaStore {
    client: Arc<dyn ObjectStore>,
    bucket: String,
}

impl MediaStore {
    pub fn connect(config: &Config) -> Result<Self> {
        let mut builder = AmazonS3Builder::new()
            .with_endpoint(config.store_url())
            .with_bucket_name(&config.bucket)
            .with_access_key_id(&config.access_key)
            .with_secret_access_key(&config.secret_key)
            .with_region(&config.region)
            .with_virtual_hosted_style_request(false);

        if !config.use_ssl {
            builder = builder.with_allow_http(true);
        }

        let client = builder
            .build()
            .map_err(|e| AppError::Config(format!("store client: {}", e)))?;

        Ok(Self {
            client: Arc::new(client),
            bucket: config.bucket.clone(),
        })
    }

    /// Build a store over an already-constructed client. Tests use this
    /// with `object_store::memory::InMemory`.
    pub fn with_client(client: Arc<dyn ObjectStore>, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Flat listing of every key in the bucket, in store order. The
    /// stream is consumed exactly once; an error item means the listing
    /// cannot be trusted and the whole traversal must be discarded.
    pub fn list(&self) -> BoxStream<'static, Result<ObjectMeta>> {
        self.client
            .list(None)
            .map(|item| {
                item.map(into_meta)
                    .map_err(|e| AppError::StoreUnavailable(e.to_string()))
            })
            .boxed()
    }

    /// Open a byte stream for a single object.
    pub async fn get(&self, key: &str) -> Result<BoxStream<'static, Result<Bytes>>> {
        let result = self
            .client
            .get(&Path::from(key))
            .await
            .map_err(|e| match e {
                object_store::Error::NotFound { .. } => AppError::NotFound(key.to_string()),
                other => AppError::StoreUnavailable(other.to_string()),
            })?;

        Ok(result
            .into_stream()
            .map(|chunk| chunk.map_err(|e| AppError::StoreUnavailable(e.to_string())))
            .boxed())
    }

    /// Write an object and return its metadata. When the store does not
    /// report an etag, a sha256 of the payload stands in.
    pub async fn put(&self, key: &str, bytes: Bytes) -> Result<ObjectMeta> {
        let size = bytes.len() as u64;

        let fallback_etag = || {
            let mut hasher = Sha256::new();
            hasher.update(&bytes);
            hex::encode(hasher.finalize())
        };

        let result = self
            .client
            .put(&Path::from(key), PutPayload::from(bytes.clone()))
            .await
            .map_err(|e| AppError::StoreWrite(e.to_string()))?;

        let etag = result
            .e_tag
            .map(|t| t.trim_matches('"').to_string())
            .unwrap_or_else(fallback_etag);

        Ok(ObjectMeta {
            name: key.to_string(),
            size,
            last_modified: Utc::now(),
            etag,
        })
    }

    /// Probe the bucket once. Used at startup so an unreachable or
    /// missing bucket fails the boot instead of serving an empty catalog.
    pub async fn check_available(&self) -> Result<()> {
        self.client
            .list_with_delimiter(None)
            .await
            .map_err(|e| AppError::StoreUnavailable(e.to_string()))?;
        Ok(())
    }
}

fn into_meta(meta: object_store::ObjectMeta) -> ObjectMeta {
    ObjectMeta {
        name: meta.location.to_string(),
        size: meta.size,
        last_modified: meta.last_modified,
        etag: meta
            .e_tag
            .map(|t| t.trim_matches('"').to_string())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use object_store::memory::InMemory;

    fn memory_store() -> MediaStore {
        MediaStore::with_client(Arc::new(InMemory::new()), "videos")
    }

    #[tokio::test]
    async fn put_then_get_roundtrip() {
        let store = memory_store();
        let meta = store.put("demo.mp4", Bytes::from_static(b"frames")).await.unwrap();

        assert_eq!(meta.name, "demo.mp4");
        assert_eq!(meta.size, 6);
        assert!(!meta.etag.is_empty());

        let mut stream = store.get("demo.mp4").await.unwrap();
        let mut body = Vec::new();
        while let Some(chunk) = stream.next().await {
            body.extend_from_slice(&chunk.unwrap());
        }
        assert_eq!(body, b"frames");
    }

    #[tokio::test]
    async fn get_missing_key_is_not_found() {
        let store = memory_store();
        let err = store.get("unknown-key").await.map(|_| ()).unwrap_err();
        assert!(matches!(err, AppError::NotFound(key) if key == "unknown-key"));
    }

    #[tokio::test]
    async fn list_preserves_store_order() {
        let store = memory_store();
        store.put("a.mp4", Bytes::from_static(b"a")).await.unwrap();
        store.put("b.jpg", Bytes::from_static(b"bb")).await.unwrap();

        let names: Vec<String> = store
            .list()
            .map(|item| item.unwrap().name)
            .collect::<Vec<_>>()
            .await;
        assert_eq!(names, ["a.mp4", "b.jpg"]);
    }
}
