use serde::Deserialize;

use crate::config::modules::ModuleEntry;
use crate::utils::constants::{
    DEFAULT_BOOKS_BASE_URL, DEFAULT_CONNECT_TIMEOUT_MS, DEFAULT_MAX_PAGES, DEFAULT_REQUEST_TIMEOUT_MS,
    DEFAULT_TOKEN_CACHE_PATH, DEFAULT_TOKEN_URL, MAX_PER_PAGE,
};

/// ================================
/// Full export configuration
/// ================================
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct ExportConfig {
    pub settings: SettingsConfig,
    pub auth: AuthConfig,
    pub fetch: FetchConfig,
    pub output: OutputConfig,
    /// fail the run when a module ends on a failed page instead of keeping the partial result
    pub strict: bool,
    /// empty list means the default module set
    pub modules: Vec<ModuleEntry>,
}

/// ================================
/// Global settings
/// ================================
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct SettingsConfig {
    pub logging: Option<LoggingConfig>,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HttpConfig {
    pub request_timeout_ms: u64,
    pub connect_timeout_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
        }
    }
}

/// ================================
/// OAuth2 token exchange
/// ================================
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AuthConfig {
    pub token_url: String,
    pub cache_path: String,
    /// skip the cache file and always exchange the refresh token
    pub force_refresh: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_url: DEFAULT_TOKEN_URL.to_owned(),
            cache_path: DEFAULT_TOKEN_CACHE_PATH.to_owned(),
            force_refresh: false,
        }
    }
}

/// ================================
/// Pagination
/// ================================
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FetchConfig {
    pub base_url: String,
    /// invariant: 1..=200
    pub per_page: u32,
    /// circuit breaker against an API that never signals the end
    pub max_pages: u32,
    pub termination: TerminationPolicy,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BOOKS_BASE_URL.to_owned(),
            per_page: MAX_PER_PAGE,
            max_pages: DEFAULT_MAX_PAGES,
            termination: TerminationPolicy::default(),
        }
    }
}

/// How the fetch loop decides that a module has no more pages.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TerminationPolicy {
    /// Stop on an empty item array or a missing item key.
    #[default]
    EmptyPage,
    /// Stop when `page_context.has_more_page` is false or absent.
    HasMoreFlag,
}

/// ================================
/// Output files
/// ================================
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: String,
    /// do not create a file for a module that returned no records
    pub skip_empty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { dir: ".".to_owned(), skip_empty: false }
    }
}

/// ================================
/// Logging
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String, // allowed: trace, debug, info, warn, error
    pub format: LogFormat,
}

impl LoggingConfig {
    pub fn new(level: String, format: LogFormat) -> Self {
        Self { level, format }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_owned(), format: LogFormat::Compact }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Compact,
}
