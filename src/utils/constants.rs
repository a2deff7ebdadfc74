//! Shared constants and invariants

pub const DEFAULT_CONFIG_PATH: &str = "books-export.yaml";

pub const DEFAULT_TOKEN_URL: &str = "https://accounts.zoho.com/oauth/v2/token";
pub const DEFAULT_BOOKS_BASE_URL: &str = "https://books.zoho.com/api/v3";
pub const DEFAULT_TOKEN_CACHE_PATH: &str = "zoho_token.json";

pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 10_000;

/// Upper bound accepted by the Books API for `per_page`.
pub const MAX_PER_PAGE: u32 = 200;
pub const DEFAULT_MAX_PAGES: u32 = 100;

pub const AUTHORIZATION_SCHEME: &str = "Zoho-oauthtoken";
pub const GRANT_TYPE_REFRESH_TOKEN: &str = "refresh_token";
pub const ACCESS_TOKEN_FIELD: &str = "access_token";

// Environment variables holding credentials
pub const ENV_CLIENT_ID: &str = "CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "CLIENT_SECRET";
pub const ENV_REFRESH_TOKEN: &str = "REFRESH_TOKEN";
pub const ENV_ORG_ID: &str = "ORG_ID";

// Modules exported when the settings file does not list any
pub const MODULE_INVOICES: &str = "invoices";
pub const MODULE_BILLS: &str = "bills";
pub const MODULE_EXPENSES: &str = "expenses";
pub const MODULE_CREDIT_NOTES: &str = "creditnotes";
pub const MODULE_JOURNALS: &str = "journals";

pub const DEFAULT_MODULES: [&str; 5] = [
    MODULE_INVOICES,
    MODULE_BILLS,
    MODULE_EXPENSES,
    MODULE_CREDIT_NOTES,
    MODULE_JOURNALS,
];
