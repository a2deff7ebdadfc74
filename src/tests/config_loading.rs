use std::collections::HashMap;

use tempfile::tempdir;

use crate::config::credentials::Credentials;
use crate::config::loader::{expand_vars_with, file_to_config, parse_config};
use crate::config::modules::{resolve_modules, BooksModule};
use crate::config::settings::{LogFormat, TerminationPolicy};
use crate::error::ExportError;
use crate::utils::config_loader;
use crate::utils::constants::{DEFAULT_BOOKS_BASE_URL, DEFAULT_TOKEN_CACHE_PATH, DEFAULT_TOKEN_URL};
use crate::utils::logging::{self, LogLevel};

#[test]
fn empty_document_yields_defaults() {
    let config = parse_config("").expect("config");

    assert_eq!(config.auth.token_url, DEFAULT_TOKEN_URL);
    assert_eq!(config.auth.cache_path, DEFAULT_TOKEN_CACHE_PATH);
    assert_eq!(config.fetch.base_url, DEFAULT_BOOKS_BASE_URL);
    assert_eq!(config.fetch.per_page, 200);
    assert_eq!(config.fetch.max_pages, 100);
    assert_eq!(config.fetch.termination, TerminationPolicy::EmptyPage);
    assert_eq!(config.output.dir, ".");
    assert!(!config.output.skip_empty);
    assert!(!config.strict);
    assert_eq!(config.settings.logging.map(|l| l.level), Some("info".to_owned()));

    let modules: Vec<String> = resolve_modules(&config.modules).into_iter().map(|m| m.output_file).collect();
    assert_eq!(
        modules,
        vec!["invoices.json", "bills.json", "expenses.json", "creditnotes.json", "journals.json"]
    );
}

#[test]
fn full_document_is_parsed() {
    let yaml = r#"
settings:
  logging:
    level: debug
    format: json
  http:
    request_timeout_ms: 5000
    connect_timeout_ms: 1000
auth:
  token_url: https://accounts.zoho.eu/oauth/v2/token
  cache_path: /var/cache/books/token.json
  force_refresh: true
fetch:
  base_url: https://books.zoho.eu/api/v3
  per_page: 100
  max_pages: 20
  termination: has_more_flag
output:
  dir: exports
  skip_empty: true
strict: true
modules:
  - invoices
  - name: journals
    item_key: journals
    output_file: journal_entries.json
"#;
    let config = parse_config(yaml).expect("config");

    let logging = config.settings.logging.expect("logging");
    assert_eq!(logging.level, "debug");
    assert_eq!(logging.format, LogFormat::Json);
    assert_eq!(config.settings.http.request_timeout_ms, 5000);
    assert_eq!(config.settings.http.connect_timeout_ms, 1000);
    assert!(config.auth.force_refresh);
    assert_eq!(config.fetch.per_page, 100);
    assert_eq!(config.fetch.max_pages, 20);
    assert_eq!(config.fetch.termination, TerminationPolicy::HasMoreFlag);
    assert!(config.output.skip_empty);
    assert!(config.strict);

    let modules = resolve_modules(&config.modules);
    assert_eq!(modules[0], BooksModule::named("invoices"));
    assert_eq!(
        modules[1],
        BooksModule {
            name: "journals".to_owned(),
            item_key: "journals".to_owned(),
            output_file: "journal_entries.json".to_owned(),
        }
    );
}

#[test]
fn out_of_range_paging_is_rejected() {
    for yaml in ["fetch:\n  per_page: 500\n", "fetch:\n  per_page: 0\n", "fetch:\n  max_pages: 0\n"] {
        let err = parse_config(yaml).unwrap_err();
        assert!(matches!(err, ExportError::Config(_)), "{yaml} -> {err:?}");
    }
}

#[test]
fn unknown_termination_policy_is_rejected() {
    let err = parse_config("fetch:\n  termination: forever\n").unwrap_err();
    assert!(matches!(err, ExportError::Config(_)));
}

#[test]
fn env_placeholders_are_expanded() {
    let vars = HashMap::from([("BOOKS_EXPORT_TEST_DIR", "/tmp/books")]);

    let expanded = expand_vars_with(
        "dir: ${BOOKS_EXPORT_TEST_DIR}\nurl: ${BOOKS_EXPORT_TEST_MISSING:https://books.zoho.in/api/v3}\nempty: ${BOOKS_EXPORT_TEST_MISSING}\n",
        |key| vars.get(key).map(|v| v.to_string()),
    );

    assert_eq!(expanded, "dir: /tmp/books\nurl: https://books.zoho.in/api/v3\nempty: \n");
}

#[test]
fn settings_file_is_loaded_with_expansion() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("books-export.yaml");
    // never set anywhere, so the default applies
    std::fs::write(&path, "output:\n  dir: ${BOOKS_EXPORT_UNSET_OUTPUT_DIR:exports}\n").unwrap();

    let config = file_to_config(&path).expect("config");
    assert_eq!(config.output.dir, "exports");
}

#[test]
fn missing_settings_file_falls_back_to_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("absent.yaml");

    let config = config_loader::run(path.to_str().unwrap()).expect("defaults");
    assert_eq!(config.fetch.max_pages, 100);
}

#[test]
fn cli_log_level_overrides_settings() {
    let config = parse_config("settings:\n  logging:\n    level: warn\n    format: json\n").expect("config");

    let resolved = logging::resolve(&config, Some(LogLevel::DEBUG));
    assert_eq!(resolved.level, "debug");
    assert_eq!(resolved.format, LogFormat::Json);

    let resolved = logging::resolve(&config, None);
    assert_eq!(resolved.level, "warn");
}

#[test]
fn credentials_require_every_variable() {
    let mut vars: HashMap<&str, String> = HashMap::from([
        ("CLIENT_ID", "1000.ABC".to_owned()),
        ("CLIENT_SECRET", "secret".to_owned()),
        ("REFRESH_TOKEN", "1000.refresh".to_owned()),
        ("ORG_ID", "60001234".to_owned()),
    ]);

    let credentials = Credentials::from_lookup(|key| vars.get(key).cloned()).expect("credentials");
    assert_eq!(credentials, Credentials::new("1000.ABC", "secret", "1000.refresh", "60001234"));

    vars.insert("REFRESH_TOKEN", "   ".to_owned());
    let err = Credentials::from_lookup(|key| vars.get(key).cloned()).unwrap_err();
    assert!(matches!(err, ExportError::Config(ref msg) if msg.contains("REFRESH_TOKEN")));

    vars.remove("ORG_ID");
    vars.insert("REFRESH_TOKEN", "1000.refresh".to_owned());
    let err = Credentials::from_lookup(|key| vars.get(key).cloned()).unwrap_err();
    assert!(matches!(err, ExportError::Config(ref msg) if msg.contains("ORG_ID")));
}

#[test]
fn credentials_debug_hides_secrets() {
    let printed = format!("{:?}", Credentials::new("cid", "top-secret", "refresh-value", "org"));

    assert!(printed.contains("cid"));
    assert!(!printed.contains("top-secret"));
    assert!(!printed.contains("refresh-value"));
}

#[test]
fn example_settings_file_parses() {
    let config = file_to_config(std::path::Path::new("books-export.example.yaml")).expect("example config");

    assert_eq!(resolve_modules(&config.modules), BooksModule::defaults());
    assert_eq!(config.fetch.termination, TerminationPolicy::EmptyPage);
}
