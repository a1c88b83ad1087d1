use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use chrono::Utc;
use futures_util::StreamExt;
use tokio::sync::RwLock;

use crate::{
    error::Result,
    models::{Catalog, CatalogEntry, MediaResponse},
    store::MediaStore,
};

/// Builds a catalog from a full bucket listing.
#[derive(Clone)]
pub struct CatalogBuilder {
    store: MediaStore,
}

impl CatalogBuilder {
    pub fn new(store: MediaStore) -> Self {
        Self { store }
    }

    /// Consume the entire listing and assemble a catalog. A listing error
    /// anywhere in the stream discards all partial results; the caller's
    /// previous catalog is never touched from here.
    pub async fn build(&self) -> Result<Catalog> {
        let mut listing = self.store.list();
        let mut entries = Vec::new();
        let mut seen = 0_usize;

        while let Some(item) = listing.next().await {
            let meta = item?;
            seen += 1;
            if let Some(entry) = CatalogEntry::from_meta(meta) {
                entries.push(entry);
            }
        }

        tracing::debug!(
            "Listed {} objects in bucket {}, {} classified as media",
            seen,
            self.store.bucket(),
            entries.len()
        );

        Ok(Catalog {
            timestamp: Utc::now(),
            entries,
        })
    }
}

/// Holds the most recent successfully built catalog. `None` until the
/// first build succeeds. Replacement is wholesale: readers get either the
/// previous snapshot or the new one, never a mixture.
#[derive(Clone, Default)]
pub struct CatalogStore {
    inner: Arc<RwLock<Option<Arc<Catalog>>>>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn current(&self) -> Option<Arc<Catalog>> {
        self.inner.read().await.clone()
    }

    pub async fn replace(&self, catalog: Arc<Catalog>) {
        *self.inner.write().await = Some(catalog);
    }
}

/// Drives catalog rebuilds, on demand and on a fixed interval.
///
/// Overlapping refreshes are allowed: concurrent callers race to
/// `replace()` and the last build to complete wins. The atomic swap in
/// `CatalogStore` is the only ordering guarantee.
#[derive(Clone)]
pub struct Refresher {
    builder: CatalogBuilder,
    catalog: CatalogStore,
    snapshot_path: Option<PathBuf>,
}

impl Refresher {
    pub fn new(store: MediaStore, catalog: CatalogStore, snapshot_path: Option<PathBuf>) -> Self {
        Self {
            builder: CatalogBuilder::new(store),
            catalog,
            snapshot_path,
        }
    }

    /// Rebuild the catalog and install it. On failure the previous
    /// catalog stays in place and the error propagates to the caller.
    pub async fn refresh_now(&self) -> Result<Arc<Catalog>> {
        let catalog = Arc::new(self.builder.build().await?);
        self.catalog.replace(Arc::clone(&catalog)).await;

        tracing::info!("Catalog refreshed: {} media files", catalog.total_files());

        if let Some(path) = &self.snapshot_path {
            self.write_snapshot(&catalog, path).await;
        }

        Ok(catalog)
    }

    /// Convenience export of the catalog; never read back. Failures are
    /// logged and do not fail the refresh.
    async fn write_snapshot(&self, catalog: &Catalog, path: &Path) {
        let snapshot = MediaResponse::from_catalog(catalog);
        let json = match serde_json::to_vec_pretty(&snapshot) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("Failed to serialize catalog snapshot: {}", e);
                return;
            }
        };

        match tokio::fs::write(path, json).await {
            Ok(()) => tracing::debug!("Wrote catalog snapshot to {}", path.display()),
            Err(e) => tracing::warn!("Failed to write catalog snapshot: {}", e),
        }
    }

    /// Background refresh loop. Failures keep the last good snapshot and
    /// the loop running.
    pub fn spawn_interval(&self, every: Duration) -> tokio::task::JoinHandle<()> {
        let refresher = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            // First tick fires immediately; skip it, the boot path
            // already refreshed once.
            ticker.tick().await;

            loop {
                ticker.tick().await;
                if let Err(e) = refresher.refresh_now().await {
                    tracing::warn!("Background refresh failed, keeping last catalog: {}", e);
                }
            }
        })
    }
}
