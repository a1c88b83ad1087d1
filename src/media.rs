use serde::Serialize;

/// Video extensions surfaced by the catalog.
const VIDEO_EXTENSIONS: [&str; 8] = ["mp4", "avi", "mov", "mkv", "wmv", "flv", "webm", "m4v"];

/// Image extensions surfaced by the catalog.
const IMAGE_EXTENSIONS: [&str; 8] = ["jpg", "jpeg", "png", "gif", "bmp", "webp", "svg", "tiff"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Video,
    Image,
    Other,
}

/// Classify a filename by its extension. Case-insensitive; filenames
/// without a `.` or with an unrecognized extension are `Other`.
pub fn classify(filename: &str) -> MediaType {
    let lowered = filename.to_lowercase();
    let Some((_, ext)) = lowered.rsplit_once('.') else {
        return MediaType::Other;
    };

    if VIDEO_EXTENSIONS.contains(&ext) {
        MediaType::Video
    } else if IMAGE_EXTENSIONS.contains(&ext) {
        MediaType::Image
    } else {
        MediaType::Other
    }
}

/// Render a byte count as a human-readable size, e.g. `1536` -> `"1.5 KB"`.
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    const UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

    let exponent = ((bytes as f64).ln() / 1024_f64.ln()).floor() as usize;
    let exponent = exponent.min(UNITS.len() - 1);

    let scaled = bytes as f64 / 1024_f64.powi(exponent as i32);
    let rounded = (scaled * 100.0).round() / 100.0;

    format!("{} {}", rounded, UNITS[exponent])
}

/// Content type for a key based on its extension. Unknown extensions fall
/// back to a generic binary type.
pub fn content_type_for(key: &str) -> &'static str {
    let lowered = key.to_lowercase();
    let ext = lowered.rsplit_once('.').map(|(_, e)| e).unwrap_or("");

    match ext {
        "mp4" => "video/mp4",
        "avi" => "video/x-msvideo",
        "mov" => "video/quicktime",
        "mkv" => "video/x-matroska",
        "wmv" => "video/x-ms-wmv",
        "flv" => "video/x-flv",
        "webm" => "video/webm",
        "m4v" => "video/x-m4v",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "tiff" => "image/tiff",
        "ico" => "image/x-icon",
        "json" => "application/json",
        "html" => "text/html",
        "js" => "text/javascript",
        "css" => "text/css",
        _ => "application/octet-stream",
    }
}
