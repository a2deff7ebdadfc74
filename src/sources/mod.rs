//! Sources module
//!
//! Upstream HTTP collaborators: the OAuth2 token endpoint and the paginated Books API.

pub mod books;
pub mod oauth2;

use std::time::Duration;

use reqwest::Client;

use crate::config::settings::HttpConfig;
use crate::error::{ExportError, ExportResult};

/// Shared HTTP client with explicit timeouts.
pub fn build_client(cfg: &HttpConfig) -> ExportResult<Client> {
    Client::builder()
        .timeout(Duration::from_millis(cfg.request_timeout_ms))
        .connect_timeout(Duration::from_millis(cfg.connect_timeout_ms))
        .build()
        .map_err(|e| ExportError::Config(format!("failed to build HTTP client: {}", e)))
}
