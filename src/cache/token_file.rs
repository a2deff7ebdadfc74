use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde_json::Value;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::cache::token::Token;
use crate::error::{ExportError, ExportResult};
use crate::utils::constants::ACCESS_TOKEN_FIELD;

static OBTAINED_AT_FIELD: &str = "obtained_at";

/// Token cache persisted as a single JSON file.
///
/// Read at most once and written at most once per run. Several processes sharing
/// one path race on the rename and are not supported.
#[derive(Debug, Clone)]
pub struct TokenFile {
    path: PathBuf,
}

impl TokenFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Cached token, if the file exists and holds a non-empty `access_token`.
    ///
    /// Freshness is not checked. Unreadable or malformed files count as absent.
    pub async fn load(&self) -> Option<Token> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("token cache '{}' not found", self.path.display());
                return None;
            }
            Err(e) => {
                warn!("token cache '{}' is unreadable: {}", self.path.display(), e);
                return None;
            }
        };

        let json: Value = serde_json::from_str(&content)
            .inspect_err(|e| warn!("token cache '{}' is not valid JSON: {}", self.path.display(), e))
            .ok()?;

        extract_access_token(&json).map(Token::new)
    }

    /// Persist the full token response, stamped with the time it was obtained.
    ///
    /// Written to a sibling temp file first and renamed into place.
    pub async fn store(&self, response: &Value) -> ExportResult<()> {
        let mut document = response.clone();
        if let Value::Object(map) = &mut document {
            map.insert(OBTAINED_AT_FIELD.to_owned(), Value::String(Utc::now().to_rfc3339()));
        }

        let serialized = serde_json::to_vec_pretty(&document).map_err(|e| self.io_error(e.into()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| self.io_error(e))?;
        }

        let tmp = self.path.with_extension("tmp");
        if let Err(e) = write_then_rename(&tmp, &self.path, &serialized).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(self.io_error(e));
        }

        info!("token cache written to '{}'", self.path.display());
        Ok(())
    }

    fn io_error(&self, source: std::io::Error) -> ExportError {
        ExportError::Serialization { path: self.path.clone(), source }
    }
}

/// Non-empty `access_token` string of a token response.
pub fn extract_access_token(json: &Value) -> Option<String> {
    json.get(ACCESS_TOKEN_FIELD)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
}

/// Temp file is created owner-only (0600 on Unix) before any byte is written.
async fn write_then_rename(tmp: &Path, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    match fs::remove_file(tmp).await {
        Err(e) if e.kind() != ErrorKind::NotFound => return Err(e),
        _ => {}
    }

    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options.open(tmp).await?;
    file.write_all(bytes).await?;
    file.sync_all().await?;
    drop(file);

    fs::rename(tmp, path).await
}
