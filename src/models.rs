use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::media::{self, MediaType};

/// Metadata for a single object as reported by the store.
#[derive(Debug, Clone, Serialize)]
pub struct ObjectMeta {
    pub name: String,
    pub size: u64,
    #[serde(rename = "lastModified")]
    pub last_modified: DateTime<Utc>,
    pub etag: String,
}

/// A classified catalog entry. Only video and image objects become
/// entries; everything else is dropped at build time.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogEntry {
    #[serde(flatten)]
    pub meta: ObjectMeta,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    #[serde(rename = "sizeFormatted")]
    pub size_formatted: String,
}

impl CatalogEntry {
    /// Classify an object; returns `None` for objects the catalog does
    /// not surface.
    pub fn from_meta(meta: ObjectMeta) -> Option<Self> {
        let media_type = media::classify(&meta.name);
        if media_type == MediaType::Other {
            return None;
        }

        let size_formatted = media::format_size(meta.size);
        Some(Self {
            meta,
            media_type,
            size_formatted,
        })
    }
}

/// An immutable snapshot of the bucket's media contents. Entries keep the
/// order the store listed them in.
#[derive(Debug, Clone, Serialize)]
pub struct Catalog {
    pub timestamp: DateTime<Utc>,
    pub entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn total_files(&self) -> usize {
        self.entries.len()
    }

    pub fn videos(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries
            .iter()
            .filter(|e| e.media_type == MediaType::Video)
    }

    pub fn images(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries
            .iter()
            .filter(|e| e.media_type == MediaType::Image)
    }
}

/// Body of `GET /api/media` and of the optional snapshot export.
#[derive(Debug, Serialize)]
pub struct MediaResponse {
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "totalFiles")]
    pub total_files: usize,
    pub videos: Vec<CatalogEntry>,
    pub images: Vec<CatalogEntry>,
    #[serde(rename = "allFiles")]
    pub all_files: Vec<CatalogEntry>,
}

impl MediaResponse {
    pub fn from_catalog(catalog: &Catalog) -> Self {
        Self {
            timestamp: catalog.timestamp,
            total_files: catalog.total_files(),
            videos: catalog.videos().cloned().collect(),
            images: catalog.images().cloned().collect(),
            all_files: catalog.entries.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub success: bool,
    pub message: String,
    #[serde(rename = "totalFiles")]
    pub total_files: usize,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    #[serde(rename = "fileName")]
    pub file_name: String,
    pub etag: String,
    pub size: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(name: &str, size: u64) -> ObjectMeta {
        ObjectMeta {
            name: name.to_string(),
            size,
            last_modified: Utc::now(),
            etag: "etag".to_string(),
        }
    }

    #[test]
    fn entries_exclude_unclassified_objects() {
        assert!(CatalogEntry::from_meta(meta("a.mp4", 10)).is_some());
        assert!(CatalogEntry::from_meta(meta("b.jpg", 10)).is_some());
        assert!(CatalogEntry::from_meta(meta("c.txt", 10)).is_none());
    }

    #[test]
    fn catalog_views_partition_entries() {
        let entries: Vec<CatalogEntry> = [meta("a.mp4", 1), meta("b.jpg", 2), meta("c.webm", 3)]
            .into_iter()
            .filter_map(CatalogEntry::from_meta)
            .collect();
        let catalog = Catalog {
            timestamp: Utc::now(),
            entries,
        };

        assert_eq!(catalog.total_files(), 3);
        assert_eq!(
            catalog.videos().count() + catalog.images().count(),
            catalog.total_files()
        );
    }

    #[test]
    fn entry_serializes_with_wire_field_names() {
        let entry = CatalogEntry::from_meta(meta("a.mp4", 1536)).unwrap();
        let value = serde_json::to_value(&entry).unwrap();

        assert_eq!(value["name"], "a.mp4");
        assert_eq!(value["size"], 1536);
        assert_eq!(value["type"], "video");
        assert_eq!(value["sizeFormatted"], "1.5 KB");
        assert!(value["lastModified"].is_string());
        assert_eq!(value["etag"], "etag");
    }
}
