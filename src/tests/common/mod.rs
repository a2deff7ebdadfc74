// tests/common/mod.rs
pub use serde_json::json;

use std::path::Path;

use httpmock::MockServer;
use reqwest::Client;
use serde_json::Value;

use crate::config::credentials::Credentials;
use crate::config::modules::ModuleEntry;
use crate::config::settings::{AuthConfig, ExportConfig, FetchConfig, TerminationPolicy};

pub const TOKEN_PATH: &str = "/oauth/v2/token";
pub const API_PATH: &str = "/api/v3";
pub const ORG_ID: &str = "60001234";

pub fn build_reqwest_client() -> Client {
    Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()
        .expect("reqwest client")
}

pub fn test_credentials() -> Credentials {
    Credentials::new("client-id", "client-secret", "refresh-abc", ORG_ID)
}

/// `count` records of the form `{"<kind>_id": "<start + i>", "total": i}`.
pub fn fake_records(kind: &str, start: usize, count: usize) -> Vec<Value> {
    (start..start + count)
        .map(|i| json!({ format!("{}_id", kind): i.to_string(), "total": i as f64 * 10.5 }))
        .collect()
}

pub fn page_body(item_key: &str, records: Vec<Value>, has_more_page: bool) -> Value {
    json!({
        "code": 0,
        "message": "success",
        item_key: records,
        "page_context": { "has_more_page": has_more_page }
    })
}

pub fn fetch_config(server: &MockServer, termination: TerminationPolicy, max_pages: u32) -> FetchConfig {
    FetchConfig {
        base_url: server.url(API_PATH),
        termination,
        max_pages,
        ..FetchConfig::default()
    }
}

pub fn auth_config(server: &MockServer, cache_dir: &Path) -> AuthConfig {
    AuthConfig {
        token_url: server.url(TOKEN_PATH),
        cache_path: cache_dir.join("zoho_token.json").to_string_lossy().into_owned(),
        force_refresh: false,
    }
}

/// Config pointing every upstream URL at `server` and every file into `dir`.
pub fn export_config(server: &MockServer, dir: &Path, modules: &[&str]) -> ExportConfig {
    let mut config = ExportConfig::default();
    config.auth = auth_config(server, dir);
    config.fetch = fetch_config(server, TerminationPolicy::EmptyPage, 10);
    config.output.dir = dir.join("out").to_string_lossy().into_owned();
    config.modules = modules.iter().map(|m| ModuleEntry::Name(m.to_string())).collect();
    config
}
