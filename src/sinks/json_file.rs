use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use tokio::fs;
use tracing::info;

use crate::error::{ExportError, ExportResult};

const INDENT: &[u8] = b"    ";

/// Result of writing one module's records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteReport {
    pub path: PathBuf,
    pub records: usize,
    pub columns: usize,
    /// false when an empty result was skipped
    pub written: bool,
}

/// Writes record sequences as indented JSON arrays of uniformly shaped objects.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    pub dir: PathBuf,
    pub skip_empty: bool,
}

impl JsonFileSink {
    pub fn new(dir: impl Into<PathBuf>, skip_empty: bool) -> Self {
        Self { dir: dir.into(), skip_empty }
    }

    pub async fn write(&self, records: &[Value], file_name: &str) -> ExportResult<WriteReport> {
        let path = self.dir.join(file_name);

        if records.is_empty() && self.skip_empty {
            info!("no records, skipping '{}'", path.display());
            return Ok(WriteReport { path, records: 0, columns: 0, written: false });
        }

        let (rows, columns) = normalize(records);
        let bytes = to_pretty_json(&rows).map_err(|e| serialization_error(&path, e.into()))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| serialization_error(&path, e))?;
        }
        fs::write(&path, bytes).await.map_err(|e| serialization_error(&path, e))?;

        info!("{} records written to '{}'", rows.len(), path.display());
        Ok(WriteReport { path, records: rows.len(), columns: columns.len(), written: true })
    }
}

/// Give every object record the same columns in first-seen order, filling gaps with `null`.
///
/// Nested values are kept as they are. Non-object records pass through untouched.
pub fn normalize(records: &[Value]) -> (Vec<Value>, Vec<String>) {
    let mut columns: Vec<String> = Vec::new();
    for record in records {
        if let Value::Object(map) = record {
            for key in map.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.to_owned());
                }
            }
        }
    }

    let rows = records
        .iter()
        .map(|record| match record {
            Value::Object(map) => {
                let row: Map<String, Value> = columns
                    .iter()
                    .map(|column| (column.to_owned(), map.get(column).cloned().unwrap_or(Value::Null)))
                    .collect();
                Value::Object(row)
            }
            other => other.clone(),
        })
        .collect();

    (rows, columns)
}

/// UTF-8 JSON with four-space indentation; non-ASCII text is not escaped.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    value.serialize(&mut serializer)?;
    Ok(buf)
}

fn serialization_error(path: &Path, source: std::io::Error) -> ExportError {
    ExportError::Serialization { path: path.to_path_buf(), source }
}
