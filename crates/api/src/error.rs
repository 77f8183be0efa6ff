//! JSON error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;
use zeno_core::storage::StorageError;
use zeno_shared::AppError;

/// Error returned by route handlers, rendered as `{"ok": false, "error": ...}`.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// 400 with the given message.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self(AppError::Validation(message.into()))
    }

    /// 413 with the given message.
    #[must_use]
    pub fn too_large(message: impl Into<String>) -> Self {
        Self(AppError::PayloadTooLarge(message.into()))
    }

    /// 404 with the given message.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self(AppError::NotFound(message.into()))
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        if !err.is_rejection() {
            return Self(AppError::Internal(err.to_string()));
        }
        match err {
            StorageError::InvalidExtension { .. } => Self::bad_request("Only PDF files allowed"),
            StorageError::FileTooLarge { max, .. } => {
                Self::too_large(format!("File size exceeds {}", size_label(max)))
            }
            _ => Self::bad_request("Invalid filename"),
        }
    }
}

/// `5 MB` for whole mebibytes, bytes otherwise.
fn size_label(bytes: u64) -> String {
    const MIB: u64 = 1024 * 1024;
    if bytes >= MIB && bytes % MIB == 0 {
        format!("{} MB", bytes / MIB)
    } else {
        format!("{bytes} bytes")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            error!(code = self.0.error_code(), error = %self.0, "Request failed");
        }

        (
            status,
            Json(json!({
                "ok": false,
                "error": self.0.client_message(),
            })),
        )
            .into_response()
    }
}
