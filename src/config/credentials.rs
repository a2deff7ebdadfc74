use std::env;
use std::fmt;

use crate::error::{ExportError, ExportResult};
use crate::utils::constants::{ENV_CLIENT_ID, ENV_CLIENT_SECRET, ENV_ORG_ID, ENV_REFRESH_TOKEN};

/// OAuth2 client credentials and the Books organization to export.
///
/// Read once at startup and shared read-only for the rest of the run.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    pub organization_id: String,
}

impl Credentials {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        refresh_token: impl Into<String>,
        organization_id: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            refresh_token: refresh_token.into(),
            organization_id: organization_id.into(),
        }
    }

    pub fn from_env() -> ExportResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build credentials from any key lookup; missing or blank values are rejected.
    pub fn from_lookup<F>(lookup: F) -> ExportResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> ExportResult<String> {
            lookup(key)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
                .ok_or_else(|| ExportError::Config(format!("environment variable {} is not set", key)))
        };

        Ok(Self {
            client_id: required(ENV_CLIENT_ID)?,
            client_secret: required(ENV_CLIENT_SECRET)?,
            refresh_token: required(ENV_REFRESH_TOKEN)?,
            organization_id: required(ENV_ORG_ID)?,
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("refresh_token", &"***")
            .field("organization_id", &self.organization_id)
            .finish()
    }
}
