use axum::{Json, extract::Multipart, extract::State};

use crate::{
    error::{AppError, Result},
    handlers::AppState,
    media::{self, MediaType},
    models::UploadResponse,
};

/// Accepts a single multipart `file` field. The post-upload refresh is
/// best effort and never changes the upload's success response.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    tracing::info!("Upload request received");

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::BadUpload("file field has no filename".to_string()))?;

        // Reject unsupported types before buffering the body.
        if media::classify(&file_name) == MediaType::Other {
            return Err(AppError::UnsupportedType(file_name));
        }

        let bytes = field.bytes().await?;
        let size = bytes.len() as u64;

        let meta = state.uploads.accept(&file_name, size, bytes).await?;

        tracing::debug!(
            "Object available at {}",
            state.config.public_object_url(&meta.name)
        );

        // Best effort: the upload already succeeded.
        if let Err(e) = state.refresher.refresh_now().await {
            tracing::warn!("Post-upload refresh failed: {}", e);
        }

        return Ok(Json(UploadResponse {
            success: true,
            file_name: meta.name,
            etag: meta.etag,
            size: meta.size,
        }));
    }

    Err(AppError::BadUpload("no file field in request".to_string()))
}
