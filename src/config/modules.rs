use serde::Deserialize;

use crate::utils::constants::DEFAULT_MODULES;

/// A Books resource category exported to its own file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BooksModule {
    /// endpoint path segment, e.g. `invoices`
    pub name: String,
    /// key of the record array in the response body
    pub item_key: String,
    pub output_file: String,
}

impl BooksModule {
    /// Module whose item key and output file follow from its name.
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            item_key: name.to_owned(),
            output_file: format!("{}.json", name),
        }
    }

    pub fn defaults() -> Vec<BooksModule> {
        DEFAULT_MODULES.iter().map(|name| BooksModule::named(name)).collect()
    }
}

/// Module as written in the settings file: a bare name or a detailed block.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum ModuleEntry {
    Name(String),
    Detailed {
        name: String,
        item_key: Option<String>,
        output_file: Option<String>,
    },
}

impl From<&ModuleEntry> for BooksModule {
    fn from(entry: &ModuleEntry) -> Self {
        match entry {
            ModuleEntry::Name(name) => BooksModule::named(name),
            ModuleEntry::Detailed { name, item_key, output_file } => {
                let base = BooksModule::named(name);
                BooksModule {
                    item_key: item_key.to_owned().unwrap_or(base.item_key),
                    output_file: output_file.to_owned().unwrap_or(base.output_file),
                    name: base.name,
                }
            }
        }
    }
}

/// Resolve configured entries, falling back to the default module set.
pub fn resolve_modules(entries: &[ModuleEntry]) -> Vec<BooksModule> {
    if entries.is_empty() {
        return BooksModule::defaults();
    }
    entries.iter().map(BooksModule::from).collect()
}
