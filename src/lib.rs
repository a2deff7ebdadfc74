//! # Books Export Library
//!
//! Exchanges an OAuth2 refresh token for a Zoho Books access token, walks the
//! paginated list endpoints of the accounting modules and writes each module's
//! records to a local JSON file.
//!
//! Modules:
//! - `config` — credentials, settings file and module definitions
//! - `cache` — access token and its cache file
//! - `sources` — OAuth2 token endpoint and paginated Books fetcher
//! - `sinks` — JSON output files
//! - `exporter` — sequential run over all configured modules

pub mod cache;
pub mod config;
pub mod error;
pub mod exporter;
pub mod sinks;
pub mod sources;
pub mod utils;

#[cfg(test)]
mod tests;

pub use crate::error::{ExportError, FetchError};
pub use crate::exporter::{ExportSummary, Exporter};
