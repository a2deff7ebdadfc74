use std::path::PathBuf;

use http::StatusCode;

/// Errors that abort an export run.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("configuration error: {0}")]
    Config(String),

    /// Token exchange failed. Raised before any module is fetched.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Only surfaced when `strict` is enabled; otherwise the partial records are kept.
    #[error("fetch of module '{module}' failed: {source}")]
    Fetch {
        module: String,
        #[source]
        source: FetchError,
    },

    #[error("failed to write '{}': {source}", .path.display())]
    Serialization {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Why a single page request did not yield records.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("access token rejected ({0})")]
    Unauthorized(StatusCode),

    #[error("unexpected status {0}")]
    Status(StatusCode),

    #[error("response body is not valid JSON: {0}")]
    Decode(String),
}

impl FetchError {
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => FetchError::Unauthorized(status),
            other => FetchError::Status(other),
        }
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, FetchError::Unauthorized(_))
    }
}

pub type ExportResult<T> = std::result::Result<T, ExportError>;
