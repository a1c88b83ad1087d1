use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Object store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),

    #[error("File exceeds maximum allowed size: {0} bytes")]
    PayloadTooLarge(u64),

    #[error("Object store write failed: {0}")]
    StoreWrite(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid upload request: {0}")]
    BadUpload(String),

    #[error("Multipart error: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),
}

impl AppError {
    /// Stable machine-readable code for the JSON error body.
    fn code(&self) -> &'static str {
        match self {
            AppError::StoreUnavailable(_) => "store_unavailable",
            AppError::NotFound(_) => "not_found",
            AppError::UnsupportedType(_) => "unsupported_type",
            AppError::PayloadTooLarge(_) => "payload_too_large",
            AppError::StoreWrite(_) => "store_write_error",
            AppError::Config(_) => "config_invalid",
            AppError::BadUpload(_) | AppError::Multipart(_) => "bad_request",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::StoreUnavailable(_) | AppError::StoreWrite(_) => StatusCode::BAD_GATEWAY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::UnsupportedType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadUpload(_) | AppError::Multipart(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        (
            status,
            Json(json!({
                "error": self.to_string(),
                "code": self.code(),
            })),
        )
            .into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_error_kinds() {
        assert_eq!(
            AppError::StoreUnavailable("down".into()).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::NotFound("a.mp4".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::UnsupportedType("a.txt".into()).status(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
        assert_eq!(
            AppError::PayloadTooLarge(1).status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            AppError::StoreWrite("refused".into()).status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn codes_are_stable() {
        assert_eq!(
            AppError::StoreUnavailable("x".into()).code(),
            "store_unavailable"
        );
        assert_eq!(AppError::NotFound("x".into()).code(), "not_found");
        assert_eq!(
            AppError::UnsupportedType("x".into()).code(),
            "unsupported_type"
        );
        assert_eq!(AppError::PayloadTooLarge(0).code(), "payload_too_large");
    }
}
