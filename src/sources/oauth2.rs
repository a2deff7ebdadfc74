use http::StatusCode;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, error, info};

use crate::cache::token::Token;
use crate::cache::token_file::{extract_access_token, TokenFile};
use crate::config::credentials::Credentials;
use crate::config::settings::AuthConfig;
use crate::error::{ExportError, ExportResult};
use crate::utils::constants::GRANT_TYPE_REFRESH_TOKEN;

/// Resolves the bearer token for a run: from the cache file, or by exchanging
/// the refresh token at the OAuth2 token endpoint.
#[derive(Debug, Clone)]
pub struct TokenProvider {
    pub token_url: String,
    pub credentials: Credentials,
    pub cache: TokenFile,
    pub force_refresh: bool,
    pub client: Client,
}

impl TokenProvider {
    pub fn new(cfg: &AuthConfig, credentials: Credentials, client: Client) -> Self {
        Self {
            token_url: cfg.token_url.to_owned(),
            credentials,
            cache: TokenFile::new(&cfg.cache_path),
            force_refresh: cfg.force_refresh,
            client,
        }
    }

    /// Cached token when present and non-empty, a freshly exchanged one otherwise.
    pub async fn resolve_token(&self) -> ExportResult<Token> {
        if !self.force_refresh {
            if let Some(token) = self.load_cached_token().await {
                info!("using cached token from '{}'", self.cache.path().display());
                return Ok(token);
            }
        }
        self.obtain_token().await
    }

    pub async fn load_cached_token(&self) -> Option<Token> {
        self.cache.load().await
    }

    /// Exchange the refresh token for an access token and persist the response.
    pub async fn obtain_token(&self) -> ExportResult<Token> {
        let form = [
            ("refresh_token", self.credentials.refresh_token.as_str()),
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("grant_type", GRANT_TYPE_REFRESH_TOKEN),
        ];

        debug!("requesting access token from {}", self.token_url);
        let response = self
            .client
            .post(&self.token_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| ExportError::Auth(format!("token request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ExportError::Auth(format!("token response unreadable: {}", e)))?;

        if status != StatusCode::OK {
            error!(%status, "OAuth2 token request rejected");
            return Err(ExportError::Auth(format!("OAuth2 token request failed: {}: {}", status, body)));
        }

        let json: Value = serde_json::from_str(&body)
            .map_err(|e| ExportError::Auth(format!("token response is not valid JSON: {}", e)))?;

        // the endpoint answers 200 with an `error` field for a revoked refresh token
        let token = extract_access_token(&json)
            .map(Token::new)
            .ok_or_else(|| ExportError::Auth(format!("no access_token in token response: {}", describe_error(&json))))?;

        self.cache.store(&json).await?;
        info!("obtained new access token");
        Ok(token)
    }
}

fn describe_error(json: &Value) -> String {
    json.get("error")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .unwrap_or_else(|| "missing field".to_owned())
}
