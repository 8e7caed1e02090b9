// one sheet per file: <dir>/<sheet>.toon or <dir>/<sheet>.json
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::core::normalize::RawRow;
use crate::source::{RowSource, SourceError, rows_from_value};

const EXTENSIONS: [&str; 2] = ["toon", "json"];

#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DirectorySource { dir: dir.into() }
    }

    fn sheet_path(&self, sheet: &str) -> Option<PathBuf> {
        EXTENSIONS
            .iter()
            .map(|ext| self.dir.join(format!("{}.{}", sheet, ext)))
            .find(|p| p.is_file())
    }
}

fn decode(path: &Path, text: &str) -> Result<Value, String> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::from_str(text).map_err(|e| e.to_string()),
        _ => toon_format::decode_default(text).map_err(|e| e.to_string()),
    }
}

impl RowSource for DirectorySource {
    fn sheet_names(&self) -> Result<Vec<String>, SourceError> {
        let io_err = |source: std::io::Error| SourceError::Io { path: self.dir.clone(), source };

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            if !path.is_file() || !EXTENSIONS.contains(&ext) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }

        names.sort();
        names.dedup();
        Ok(names)
    }

    fn rows(&self, sheet: &str) -> Result<Vec<RawRow>, SourceError> {
        let path = self
            .sheet_path(sheet)
            .ok_or_else(|| SourceError::UnknownSheet(sheet.to_string()))?;

        let text = fs::read_to_string(&path)
            .map_err(|source| SourceError::Io { path: path.clone(), source })?;

        let value = decode(&path, &text)
            .map_err(|message| SourceError::Decode { path: path.clone(), message })?;
        let rows = rows_from_value(value)
            .map_err(|message| SourceError::Decode { path: path.clone(), message })?;

        debug!(sheet, path = %path.display(), rows = rows.len(), "loaded sheet");
        Ok(rows)
    }
}
