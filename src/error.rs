//! Error types for the html2doc library.
//!
//! Two distinct kinds of failure exist and they are deliberately kept apart:
//!
//! * [`ConvertError`]: the request itself cannot proceed (invalid upload,
//!   malformed multipart body, staging I/O fault, bad download name). These
//!   end the request with a client-error response.
//!
//! * Engine failures are NOT errors. The external converter reports a
//!   structured [`crate::engine::EngineOutcome`] with `success: false` and a
//!   human-readable message, and the HTTP response is still the normal
//!   success-class shape. A converter that cannot open its input is an
//!   expected outcome of the job, not a fault in handling the request.
//!
//! The separation keeps the handler honest: `?` only ever short-circuits on
//! conditions where no conversion result can exist at all.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Message returned when no usable file part was found in the upload.
pub const EMPTY_UPLOAD_MESSAGE: &str =
    "Please provide one .html file with property name 'files'";

/// Message returned when the first non-empty part is not `text/html`.
pub const WRONG_CONTENT_TYPE_MESSAGE: &str = "Wrong content type";

/// All request-fatal errors returned by the html2doc library.
#[derive(Debug, Error)]
pub enum ConvertError {
    // ── Upload validation ────────────────────────────────────────────────
    /// No part named `files` carried any bytes.
    #[error("{EMPTY_UPLOAD_MESSAGE}")]
    EmptyUpload,

    /// The first non-empty part declared a content type other than `text/html`.
    #[error("{WRONG_CONTENT_TYPE_MESSAGE}")]
    WrongContentType,

    /// The multipart body itself could not be parsed.
    #[error("Invalid multipart request: {0}")]
    Multipart(String),

    // ── Staging ──────────────────────────────────────────────────────────
    /// Writing the normalised HTML to the input directory failed.
    #[error("Failed to stage '{name}': {source}")]
    StagingFailed {
        name: String,
        #[source]
        source: std::io::Error,
    },

    // ── Retrieval ────────────────────────────────────────────────────────
    /// The requested download name is not a plain file name.
    ///
    /// Anything with path separators or dot-dot components is rejected so a
    /// crafted name can never resolve outside the export directory.
    #[error("Invalid file name: '{name}'")]
    InvalidFileName { name: String },

    /// No exported artifact exists under the requested name.
    #[error("File not found")]
    ExportNotFound,

    // ── Config ───────────────────────────────────────────────────────────
    /// Configuration validation failed at startup.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ConvertError {
    /// HTTP status this error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ConvertError::EmptyUpload
            | ConvertError::WrongContentType
            | ConvertError::Multipart(_)
            | ConvertError::StagingFailed { .. }
            | ConvertError::InvalidFileName { .. }
            | ConvertError::InvalidConfig(_) => StatusCode::BAD_REQUEST,
            ConvertError::ExportNotFound => StatusCode::NOT_FOUND,
        }
    }
}

/// Wire shape of every error response: `{"success": false, "message": ...}`.
#[derive(Debug, serde::Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
}

impl IntoResponse for ConvertError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            success: false,
            message: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_upload_uses_exact_message() {
        let e = ConvertError::EmptyUpload;
        assert_eq!(
            e.to_string(),
            "Please provide one .html file with property name 'files'"
        );
        assert_eq!(e.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn wrong_content_type_uses_exact_message() {
        let e = ConvertError::WrongContentType;
        assert_eq!(e.to_string(), "Wrong content type");
        assert_eq!(e.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn staging_failure_carries_the_io_fault() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let e = ConvertError::StagingFailed {
            name: "report".into(),
            source: io,
        };
        let msg = e.to_string();
        assert!(msg.contains("report"), "got: {msg}");
        assert!(msg.contains("denied"), "got: {msg}");
    }

    #[test]
    fn missing_export_is_not_found() {
        let e = ConvertError::ExportNotFound;
        assert_eq!(e.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(e.to_string(), "File not found");
    }

    #[test]
    fn invalid_name_is_bad_request() {
        let e = ConvertError::InvalidFileName {
            name: "../etc/passwd".into(),
        };
        assert_eq!(e.status_code(), StatusCode::BAD_REQUEST);
        assert!(e.to_string().contains("../etc/passwd"));
    }
}
