use std::path::Path;

use tracing::info;

use crate::config::loader::file_to_config;
use crate::config::settings::ExportConfig;
use crate::error::ExportResult;

/// Load the settings file, or run on defaults when it does not exist.
pub fn run(config_path: &str) -> ExportResult<ExportConfig> {
    let path = Path::new(config_path);
    if !path.exists() {
        info!("config file '{}' not found, using defaults", config_path);
        return Ok(ExportConfig::default());
    }
    file_to_config(path)
}
