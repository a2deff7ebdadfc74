use std::fmt;

use http::header::AUTHORIZATION;
use http::StatusCode;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::token::Token;
use crate::config::modules::BooksModule;
use crate::config::settings::{FetchConfig, TerminationPolicy};
use crate::error::FetchError;
use crate::utils::constants::AUTHORIZATION_SCHEME;

/// Why a module's fetch loop stopped.
#[derive(Debug)]
pub enum Termination {
    /// The API signalled the end of the data.
    Exhausted,
    /// `max_pages` requests were issued without an end signal.
    PageCap,
    /// A page request failed; the records before it are kept.
    Failed(FetchError),
}

impl Termination {
    /// True only when the API itself signalled that no pages are left.
    pub fn is_complete(&self) -> bool {
        matches!(self, Termination::Exhausted)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Termination::Exhausted => "exhausted",
            Termination::PageCap => "page_cap",
            Termination::Failed(_) => "failed",
        }
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::Failed(e) => write!(f, "failed: {}", e),
            other => f.write_str(other.as_str()),
        }
    }
}

/// Records of one module plus how the fetch ended.
#[derive(Debug)]
pub struct FetchOutcome {
    pub records: Vec<Value>,
    pub requests: u32,
    pub termination: Termination,
}

#[derive(Debug, Default, Deserialize)]
struct PageContext {
    #[serde(default)]
    has_more_page: bool,
}

/// One decoded page: `items` is `None` when the item key is absent or null.
#[derive(Debug)]
struct Page {
    items: Option<Vec<Value>>,
    page_context: Option<PageContext>,
}

/// Walks `page=1..` of a Books list endpoint and concatenates the item arrays.
///
/// Pages are requested strictly in order, one at a time.
#[derive(Debug, Clone)]
pub struct PaginatedFetcher {
    pub base_url: String,
    pub organization_id: String,
    pub per_page: u32,
    pub max_pages: u32,
    pub policy: TerminationPolicy,
    pub client: Client,
}

impl PaginatedFetcher {
    pub fn new(cfg: &FetchConfig, organization_id: &str, client: Client) -> Self {
        Self {
            base_url: cfg.base_url.trim_end_matches('/').to_owned(),
            organization_id: organization_id.to_owned(),
            per_page: cfg.per_page,
            max_pages: cfg.max_pages,
            policy: cfg.termination,
            client,
        }
    }

    /// Fetch every page of `module`. Never fails: errors end the loop and are
    /// reported through [`Termination::Failed`] along with the partial records.
    pub async fn fetch_all(&self, module: &BooksModule, token: &Token) -> FetchOutcome {
        let url = format!("{}/{}", self.base_url, module.name);
        let mut records: Vec<Value> = Vec::new();
        let mut page: u32 = 1;

        let termination = loop {
            if page > self.max_pages {
                warn!(module = %module.name, max_pages = self.max_pages, "page cap reached, result may be incomplete");
                break Termination::PageCap;
            }

            let fetched = match self.fetch_page(&url, &module.item_key, page, token).await {
                Ok(fetched) => fetched,
                Err(e) => {
                    warn!(module = %module.name, page, error = %e, "page request failed, keeping {} records fetched so far", records.len());
                    break Termination::Failed(e);
                }
            };

            let Some(items) = fetched.items else {
                debug!(module = %module.name, page, "item key '{}' absent, end of data", module.item_key);
                break Termination::Exhausted;
            };

            let has_more = fetched.page_context.map(|ctx| ctx.has_more_page).unwrap_or(false);
            let is_empty = items.is_empty();
            debug!(module = %module.name, page, count = items.len(), has_more, "page fetched");
            records.extend(items);

            let done = match self.policy {
                TerminationPolicy::EmptyPage => is_empty,
                TerminationPolicy::HasMoreFlag => !has_more,
            };
            if done {
                break Termination::Exhausted;
            }
            page += 1;
        };

        FetchOutcome { records, requests: page.min(self.max_pages), termination }
    }

    async fn fetch_page(&self, url: &str, item_key: &str, page: u32, token: &Token) -> Result<Page, FetchError> {
        let page = page.to_string();
        let per_page = self.per_page.to_string();
        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, token.authorization(AUTHORIZATION_SCHEME))
            .query(&[
                ("organization_id", self.organization_id.as_str()),
                ("page", page.as_str()),
                ("per_page", per_page.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status != StatusCode::OK {
            debug!(%status, body = %body, "non-200 page response");
            return Err(FetchError::from_status(status));
        }

        parse_page(&body, item_key)
    }
}

fn parse_page(body: &str, item_key: &str) -> Result<Page, FetchError> {
    let mut json: Value = serde_json::from_str(body).map_err(|e| FetchError::Decode(e.to_string()))?;

    let page_context = json
        .get("page_context")
        .and_then(|ctx| serde_json::from_value::<PageContext>(ctx.clone()).ok());

    let items = match json.get_mut(item_key).map(Value::take) {
        None | Some(Value::Null) => None,
        Some(Value::Array(items)) => Some(items),
        Some(other) => {
            return Err(FetchError::Decode(format!(
                "'{}' is not an array (found {})",
                item_key,
                json_kind(&other)
            )))
        }
    };

    Ok(Page { items, page_context })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
