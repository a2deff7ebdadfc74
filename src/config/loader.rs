use std::{fs, path::Path};

use regex::Regex;
use tracing::{debug, error};

use crate::config::settings::{ExportConfig, LoggingConfig};
use crate::error::{ExportError, ExportResult};
use crate::utils::constants::MAX_PER_PAGE;

/// Load and validate config from YAML file
pub fn file_to_config(path: &Path) -> ExportResult<ExportConfig> {
    let content = fs::read_to_string(path)
        .map_err(|e| ExportError::Config(format!("cannot read '{}': {}", path.display(), e)))?;

    let expanded = expand_env_vars(&content);
    parse_config(&expanded)
}

pub fn parse_config(content: &str) -> ExportResult<ExportConfig> {
    // an empty document deserializes to unit, not to a struct with defaults
    let mut export_config: ExportConfig = if content.trim().is_empty() {
        ExportConfig::default()
    } else {
        serde_yaml::from_str(content)
            .inspect_err(|e| error!("parse config error: {}", e))
            .map_err(|e| ExportError::Config(format!("invalid config format: {}", e)))?
    };

    // Apply defaults
    if export_config.settings.logging.is_none() {
        export_config.settings.logging = Some(LoggingConfig::default());
    }
    debug!("validation config ...");
    validate_export_config(&export_config)?;

    Ok(export_config)
}

pub fn validate_export_config(export_config: &ExportConfig) -> ExportResult<()> {
    let fetch = &export_config.fetch;
    if fetch.per_page == 0 || fetch.per_page > MAX_PER_PAGE {
        return Err(ExportError::Config(format!(
            "fetch.per_page must be between 1 and {}, got {}",
            MAX_PER_PAGE, fetch.per_page
        )));
    }
    if fetch.max_pages == 0 {
        return Err(ExportError::Config("fetch.max_pages must be greater than 0".to_owned()));
    }
    if fetch.base_url.trim().is_empty() {
        return Err(ExportError::Config("fetch.base_url must not be empty".to_owned()));
    }
    if export_config.auth.token_url.trim().is_empty() {
        return Err(ExportError::Config("auth.token_url must not be empty".to_owned()));
    }
    if export_config.auth.cache_path.trim().is_empty() {
        return Err(ExportError::Config("auth.cache_path must not be empty".to_owned()));
    }
    let http = &export_config.settings.http;
    if http.request_timeout_ms == 0 || http.connect_timeout_ms == 0 {
        return Err(ExportError::Config("settings.http timeouts must be greater than 0".to_owned()));
    }
    Ok(())
}

/// Replace `${VAR}` and `${VAR:default}` with values from the process environment.
pub fn expand_env_vars(input: &str) -> String {
    expand_vars_with(input, |var| std::env::var(var).ok())
}

/// Same as [`expand_env_vars`] with an explicit variable source.
pub fn expand_vars_with<F>(input: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let re = Regex::new(r"\$\{(\w+)(?::([^\}]+))?\}").expect("static regex");
    re.replace_all(input, |caps: &regex::Captures| {
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        lookup(&caps[1]).unwrap_or_else(|| default.to_string())
    })
    .to_string()
}
