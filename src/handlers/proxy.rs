use axum::{
    body::Body,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::{error::Result, handlers::AppState, media};

/// Relay an object's bytes as they arrive from the store. Once headers
/// are committed, a mid-stream error truncates the body.
pub async fn get_object(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Response> {
    tracing::info!("Proxy request for object: {}", key);

    let stream = state.store.get(&key).await?;
    let content_type = media::content_type_for(&key);

    tracing::debug!("Streaming {} as {}", key, content_type);

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CACHE_CONTROL, "public, max-age=3600"),
        ],
        Body::from_stream(stream),
    )
        .into_response())
}

pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "404 - Not Found")
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bytes::Bytes;
    use object_store::memory::InMemory;

    use super::*;
    use crate::{
        catalog::{CatalogStore, Refresher},
        config::Config,
        store::MediaStore,
        upload::UploadGate,
    };

    fn test_state(store: MediaStore) -> AppState {
        let config = Config {
            server_host: "127.0.0.1".into(),
            server_port: 3000,
            endpoint: "store.example.com".into(),
            endpoint_port: 443,
            use_ssl: true,
            access_key: "key".into(),
            secret_key: "secret".into(),
            region: "us-east-1".into(),
            bucket: "videos".into(),
            refresh_interval_secs: 300,
            snapshot_path: None,
        };

        AppState {
            refresher: Refresher::new(store.clone(), CatalogStore::new(), None),
            uploads: UploadGate::new(store.clone()),
            store,
            config: Arc::new(config),
        }
    }

    #[tokio::test]
    async fn missing_key_responds_not_found() {
        let state = test_state(MediaStore::with_client(Arc::new(InMemory::new()), "videos"));

        let response = get_object(State(state), Path("unknown-key".into()))
            .await
            .unwrap_err()
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn existing_key_streams_with_media_headers() {
        let store = MediaStore::with_client(Arc::new(InMemory::new()), "videos");
        store
            .put("demo.mp4", Bytes::from_static(b"frames"))
            .await
            .unwrap();

        let response = get_object(State(test_state(store)), Path("demo.mp4".into()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "video/mp4"
        );
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).unwrap(),
            "public, max-age=3600"
        );
    }
}
