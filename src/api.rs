// sheet-selection request/response used by the http/ui shell
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument};

use crate::config::{LineageConfig, OutputFormat};
use crate::core::error::LineageError;
use crate::core::graph::RenderGraph;
use crate::core::resolve::Generations;
use crate::pipeline::compute;
use crate::source::{RowSource, SourceError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Lineage(#[from] LineageError),

    #[error("failed to encode response: {0}")]
    Encode(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyRequest {
    pub sheet: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyResponse {
    pub sheets: Vec<String>,
    pub current_sheet: String,
    pub data: Generations,
    pub graph: RenderGraph,
}

/// Fetch the requested sheet (or the configured default) and compute its tree.
#[instrument(skip(source, config))]
pub fn load_family(
    source: &dyn RowSource,
    request: &FamilyRequest,
    config: &LineageConfig,
) -> Result<FamilyResponse, ApiError> {
    let sheets = source.sheet_names()?;
    let current_sheet = request
        .sheet
        .clone()
        .unwrap_or_else(|| config.default_sheet.clone());

    let rows = source.rows(&current_sheet)?;
    let tree = compute(&rows)?;

    info!(sheet = %current_sheet, rows = rows.len(), "served family tree");
    Ok(FamilyResponse {
        sheets,
        current_sheet,
        data: tree.generations,
        graph: tree.graph.to_render(),
    })
}

pub fn encode<T: Serialize>(value: &T, format: OutputFormat) -> Result<String, ApiError> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(value).map_err(|e| ApiError::Encode(e.to_string())),
        OutputFormat::Toon => toon_format::encode_default(value).map_err(|e| ApiError::Encode(e.to_string())),
    }
}
