//! The data-source seam: whatever supplies rows of raw strings per sheet.
//!
//! The computation never does I/O itself; a `RowSource` is asked once for a
//! sheet's rows before anything runs.

pub mod directory;
pub mod memory;

use std::path::PathBuf;

use serde_json::Value;
use thiserror::Error;

use crate::core::normalize::RawRow;

pub use directory::DirectorySource;
pub use memory::MemorySource;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("unknown sheet `{0}`")]
    UnknownSheet(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {path}: {message}")]
    Decode { path: PathBuf, message: String },
}

pub trait RowSource {
    /// Names of every sheet this source can serve, sorted.
    fn sheet_names(&self) -> Result<Vec<String>, SourceError>;

    /// Rows of one sheet, header excluded.
    fn rows(&self, sheet: &str) -> Result<Vec<RawRow>, SourceError>;
}

/// Accept `{ "rows": [[...], ...] }` or a bare array of rows. Scalars become
/// strings, `null` is an absent cell.
pub(crate) fn rows_from_value(value: Value) -> Result<Vec<RawRow>, String> {
    let rows = match value {
        Value::Object(mut obj) => obj.remove("rows").ok_or("missing `rows` field")?,
        other => other,
    };

    let Value::Array(rows) = rows else {
        return Err("`rows` must be an array".into());
    };

    rows.into_iter()
        .enumerate()
        .map(|(i, r)| match r {
            Value::Array(cells) => cells
                .into_iter()
                .map(|c| cell_from_value(c).ok_or_else(|| format!("row {}: nested value in cell", i)))
                .collect::<Result<RawRow, String>>(),
            _ => Err(format!("row {} is not an array", i)),
        })
        .collect()
}

fn cell_from_value(value: Value) -> Option<Option<String>> {
    match value {
        Value::Null => Some(None),
        Value::String(s) => Some(Some(s)),
        Value::Bool(b) => Some(Some(b.to_string())),
        Value::Number(n) => Some(Some(n.to_string())),
        Value::Array(_) | Value::Object(_) => None,
    }
}
