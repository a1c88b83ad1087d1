use axum::{Json, extract::State};

use crate::{
    error::Result,
    handlers::AppState,
    models::{MediaResponse, RefreshResponse},
};

/// Always refreshes from the store before answering. A failed refresh
/// is a 502, never a stale catalog.
pub async fn get_media(State(state): State<AppState>) -> Result<Json<MediaResponse>> {
    tracing::info!("GET request for media catalog");

    let catalog = state.refresher.refresh_now().await?;

    tracing::debug!("Returning {} media files", catalog.total_files());
    Ok(Json(MediaResponse::from_catalog(&catalog)))
}

pub async fn refresh(State(state): State<AppState>) -> Result<Json<RefreshResponse>> {
    tracing::info!("Refresh requested");

    let catalog = state.refresher.refresh_now().await?;

    Ok(Json(RefreshResponse {
        success: true,
        message: "Catalog updated".to_string(),
        total_files: catalog.total_files(),
    }))
}
