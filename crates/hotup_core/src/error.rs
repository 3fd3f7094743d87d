//! Error taxonomy for the update core.
//!
//! Every error surfaced to the host bridge carries one of a fixed set
//! of string codes so script-side callers can branch on them. Three
//! classes exist: input validation (rejected synchronously, no state
//! change), transient failures (retryable, never ignore-listed), and
//! permanent failures (canary rollback, version ignore-listed).

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("{0}")]
    UpdateDataRequired(String),

    #[error("download URL is required")]
    UrlRequired,

    #[error("version is required")]
    VersionRequired,

    #[error("download already in progress")]
    DownloadInProgress,

    #[error("download failed: {0}")]
    DownloadFailed(String),

    #[error("HTTP error: {0}")]
    HttpError(String),

    #[error("temp dir error: {0}")]
    TempDirError(String),

    #[error("extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("www folder not found in archive")]
    WwwNotFound,

    #[error("no update ready to install")]
    NoUpdateReady,

    #[error("downloaded update files not found")]
    UpdateFilesNotFound,

    #[error("install failed: {0}")]
    InstallFailed(String),
}

impl UpdateError {
    /// Stable error code surfaced to the host bridge.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UpdateDataRequired(_) => "UPDATE_DATA_REQUIRED",
            Self::UrlRequired => "URL_REQUIRED",
            Self::VersionRequired => "VERSION_REQUIRED",
            Self::DownloadInProgress => "DOWNLOAD_IN_PROGRESS",
            Self::DownloadFailed(_) => "DOWNLOAD_FAILED",
            Self::HttpError(_) => "HTTP_ERROR",
            Self::TempDirError(_) => "TEMP_DIR_ERROR",
            Self::ExtractionFailed(_) => "EXTRACTION_FAILED",
            Self::WwwNotFound => "WWW_NOT_FOUND",
            Self::NoUpdateReady => "NO_UPDATE_READY",
            Self::UpdateFilesNotFound => "UPDATE_FILES_NOT_FOUND",
            Self::InstallFailed(_) => "INSTALL_FAILED",
        }
    }
}

pub type Result<T> = std::result::Result<T, UpdateError>;

/// `{code, message}` pair sent to the host bridge on failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
}

impl From<&UpdateError> for ErrorPayload {
    fn from(err: &UpdateError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<UpdateError> for ErrorPayload {
    fn from(err: UpdateError) -> Self {
        Self::from(&err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_stable() {
        assert_eq!(UpdateError::UrlRequired.code(), "URL_REQUIRED");
        assert_eq!(UpdateError::NoUpdateReady.code(), "NO_UPDATE_READY");
        assert_eq!(
            UpdateError::DownloadFailed("timeout".into()).code(),
            "DOWNLOAD_FAILED"
        );
        assert_eq!(UpdateError::WwwNotFound.code(), "WWW_NOT_FOUND");
    }

    #[test]
    fn test_update_data_required_keeps_its_message() {
        let err = UpdateError::UpdateDataRequired("cannot ignore the installed version".into());
        assert_eq!(err.code(), "UPDATE_DATA_REQUIRED");
        let payload = ErrorPayload::from(err);
        assert_eq!(payload.message, "cannot ignore the installed version");
    }

    #[test]
    fn test_error_payload_shape() {
        let payload = ErrorPayload::from(UpdateError::HttpError("status 404".into()));
        assert_eq!(payload.code, "HTTP_ERROR");
        assert!(payload.message.contains("404"));
    }
}
