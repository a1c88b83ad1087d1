mod catalog;
mod config;
mod error;
mod handlers;
mod media;
mod models;
mod store;
mod upload;

use std::{path::PathBuf, sync::Arc, time::Duration};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use catalog::{CatalogStore, Refresher};
use handlers::AppState;
use store::MediaStore;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use upload::UploadGate;

// Multipart framing overhead on top of the file size limit.
const BODY_LIMIT: usize = upload::MAX_UPLOAD_BYTES as usize + 1024 * 1024;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mediagate=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting mediagate");

    let config = Arc::new(config::Config::load()?);
    tracing::info!("Configuration loaded successfully");
    tracing::debug!(
        "Server will bind to {}:{}",
        config.server_host,
        config.server_port
    );
    // Endpoint and bucket only; credentials are never logged.
    tracing::debug!("Store endpoint: {}", config.endpoint);
    tracing::debug!("Bucket: {}", config.bucket);
    tracing::debug!("Refresh interval: {}s", config.refresh_interval_secs);

    let media_store = MediaStore::connect(&config)?;

    // Fail the boot if the store is unreachable rather than serving an
    // empty catalog forever.
    media_store.check_available().await?;
    tracing::info!("Object store reachable, bucket {} found", config.bucket);

    let catalog_store = CatalogStore::new();
    let refresher = Refresher::new(
        media_store.clone(),
        catalog_store.clone(),
        config.snapshot_path.as_ref().map(PathBuf::from),
    );

    // Initial population is best effort; the periodic loop and on-demand
    // refreshes will retry.
    match refresher.refresh_now().await {
        Ok(catalog) => tracing::info!("Initial catalog: {} media files", catalog.total_files()),
        Err(e) => tracing::warn!("Initial refresh failed: {}", e),
    }

    refresher.spawn_interval(Duration::from_secs(config.refresh_interval_secs));

    let state = AppState {
        uploads: UploadGate::new(media_store.clone()),
        store: media_store,
        refresher,
        config: config.clone(),
    };

    let app = Router::new()
        .route("/api/media", get(handlers::catalog::get_media))
        .route("/api/refresh", post(handlers::catalog::refresh))
        .route(
            "/api/upload",
            post(handlers::upload::upload).layer(DefaultBodyLimit::max(BODY_LIMIT)),
        )
        .route("/media/{*key}", get(handlers::proxy::get_object))
        .fallback(handlers::proxy::not_found)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);
    tracing::info!("Catalog API: http://{}/api/media", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install shutdown handler: {}", e);
        return;
    }
    tracing::info!("Shutdown signal received, draining connections");
}
