use std::path::PathBuf;

use tracing::{error, info, warn};

use crate::config::credentials::Credentials;
use crate::config::modules::{resolve_modules, BooksModule};
use crate::config::settings::ExportConfig;
use crate::error::{ExportError, ExportResult};
use crate::sinks::json_file::JsonFileSink;
use crate::sources::books::{FetchOutcome, PaginatedFetcher, Termination};
use crate::sources::build_client;
use crate::sources::oauth2::TokenProvider;

/// Per-module result of a run.
#[derive(Debug)]
pub struct ModuleReport {
    pub module: String,
    pub records: usize,
    pub requests: u32,
    pub termination: Termination,
    /// `None` when an empty result was skipped
    pub output: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct ExportSummary {
    pub modules: Vec<ModuleReport>,
}

impl ExportSummary {
    pub fn total_records(&self) -> usize {
        self.modules.iter().map(|m| m.records).sum()
    }

    /// Modules whose output may be truncated.
    pub fn incomplete(&self) -> impl Iterator<Item = &ModuleReport> {
        self.modules.iter().filter(|m| !m.termination.is_complete())
    }
}

/// Token once, then each module fetched and written in turn.
#[derive(Debug, Clone)]
pub struct Exporter {
    pub tokens: TokenProvider,
    pub fetcher: PaginatedFetcher,
    pub sink: JsonFileSink,
    pub modules: Vec<BooksModule>,
    pub strict: bool,
}

impl Exporter {
    pub fn new(config: &ExportConfig, credentials: Credentials) -> ExportResult<Self> {
        let client = build_client(&config.settings.http)?;
        let fetcher = PaginatedFetcher::new(&config.fetch, &credentials.organization_id, client.clone());
        let tokens = TokenProvider::new(&config.auth, credentials, client);
        let sink = JsonFileSink::new(&config.output.dir, config.output.skip_empty);

        Ok(Self {
            tokens,
            fetcher,
            sink,
            modules: resolve_modules(&config.modules),
            strict: config.strict,
        })
    }

    pub async fn run(&self) -> ExportResult<ExportSummary> {
        let token = self.tokens.resolve_token().await.inspect_err(|e| error!("{}", e))?;

        let mut summary = ExportSummary::default();
        for module in &self.modules {
            info!(module = %module.name, "fetching module");
            let FetchOutcome { records, requests, termination } = self.fetcher.fetch_all(module, &token).await;

            let report = self.sink.write(&records, &module.output_file).await?;

            match &termination {
                Termination::Exhausted => {
                    info!(module = %module.name, records = records.len(), requests, "module exported")
                }
                Termination::PageCap => {
                    warn!(module = %module.name, records = records.len(), requests, "module exported up to the page cap")
                }
                Termination::Failed(e) if e.is_auth() => {
                    warn!(module = %module.name, records = records.len(), requests, "access token rejected, module output is incomplete")
                }
                Termination::Failed(_) => {
                    warn!(module = %module.name, records = records.len(), requests, "module fetch failed, output is incomplete")
                }
            }

            // partial output is already on disk at this point
            let termination = match termination {
                Termination::Failed(source) if self.strict => {
                    return Err(ExportError::Fetch { module: module.name.to_owned(), source });
                }
                other => other,
            };

            summary.modules.push(ModuleReport {
                module: module.name.to_owned(),
                records: records.len(),
                requests,
                termination,
                output: report.written.then_some(report.path),
            });
        }

        info!(
            modules = summary.modules.len(),
            records = summary.total_records(),
            incomplete = summary.incomplete().count(),
            "export finished"
        );
        Ok(summary)
    }
}
