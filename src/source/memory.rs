use std::collections::BTreeMap;

use crate::core::normalize::RawRow;
use crate::source::{RowSource, SourceError};

/// Sheets held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    sheets: BTreeMap<String, Vec<RawRow>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sheet(mut self, name: impl Into<String>, rows: Vec<RawRow>) -> Self {
        self.sheets.insert(name.into(), rows);
        self
    }
}

impl RowSource for MemorySource {
    fn sheet_names(&self) -> Result<Vec<String>, SourceError> {
        Ok(self.sheets.keys().cloned().collect())
    }

    fn rows(&self, sheet: &str) -> Result<Vec<RawRow>, SourceError> {
        self.sheets
            .get(sheet)
            .cloned()
            .ok_or_else(|| SourceError::UnknownSheet(sheet.to_string()))
    }
}
