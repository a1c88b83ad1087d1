use bytes::Bytes;

use crate::{
    error::{AppError, Result},
    media::{self, MediaType},
    models::ObjectMeta,
    store::MediaStore,
};

/// Upload ceiling, matching the HTTP request body limit.
pub const MAX_UPLOAD_BYTES: u64 = 500 * 1024 * 1024;

/// Validates inbound files before they reach the store. Rejections happen
/// before any network call; a successful `put` does not refresh the
/// catalog, that stays with the caller so an upload can succeed even when
/// a follow-up refresh fails.
#[derive(Clone)]
pub struct UploadGate {
    store: MediaStore,
}

impl UploadGate {
    pub fn new(store: MediaStore) -> Self {
        Self { store }
    }

    pub async fn accept(
        &self,
        file_name: &str,
        declared_size: u64,
        bytes: Bytes,
    ) -> Result<ObjectMeta> {
        if media::classify(file_name) == MediaType::Other {
            return Err(AppError::UnsupportedType(file_name.to_string()));
        }

        if declared_size > MAX_UPLOAD_BYTES {
            return Err(AppError::PayloadTooLarge(declared_size));
        }

        let meta = self.store.put(file_name, bytes).await?;
        tracing::info!("Uploaded {} ({} bytes)", meta.name, meta.size);
        Ok(meta)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use futures_util::StreamExt;
    use object_store::{ObjectStore, memory::InMemory};

    use super::*;

    fn gate_over(client: Arc<InMemory>) -> UploadGate {
        UploadGate::new(MediaStore::with_client(client, "videos"))
    }

    #[tokio::test]
    async fn rejects_unsupported_type_before_store_write() {
        let client = Arc::new(InMemory::new());
        let gate = gate_over(client.clone());

        let err = gate
            .accept("notes.txt", 5, Bytes::from_static(b"hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UnsupportedType(_)));

        // Nothing was written.
        assert_eq!(client.list(None).count().await, 0);
    }

    #[tokio::test]
    async fn rejects_oversized_declared_size() {
        let client = Arc::new(InMemory::new());
        let gate = gate_over(client.clone());

        // Declared size of 600 MiB is rejected without touching the body.
        let err = gate
            .accept("big.mp4", 600 * 1024 * 1024, Bytes::from_static(b""))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::PayloadTooLarge(_)));
        assert_eq!(client.list(None).count().await, 0);
    }

    #[tokio::test]
    async fn accepts_media_and_returns_metadata() {
        let gate = gate_over(Arc::new(InMemory::new()));

        let meta = gate
            .accept("clip.mp4", 6, Bytes::from_static(b"frames"))
            .await
            .unwrap();
        assert_eq!(meta.name, "clip.mp4");
        assert_eq!(meta.size, 6);
        assert!(!meta.etag.is_empty());
    }
}
