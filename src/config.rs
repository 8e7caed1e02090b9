// runtime configuration: defaults, overlaid by LINEAGE_* env vars
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_SHEET: &str = "lazlo-sarai-strange";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Toon,
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "toon" => Ok(OutputFormat::Toon),
            other => Err(ConfigError::InvalidFormat(other.to_string())),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown output format `{0}` (expected json or toon)")]
    InvalidFormat(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineageConfig {
    /// Directory holding one `<sheet>.toon` / `<sheet>.json` file per sheet.
    pub data_dir: PathBuf,
    /// Sheet served when a request names none.
    pub default_sheet: String,
    pub format: OutputFormat,
}

impl Default for LineageConfig {
    fn default() -> Self {
        LineageConfig {
            data_dir: PathBuf::from("data"),
            default_sheet: DEFAULT_SHEET.to_string(),
            format: OutputFormat::Json,
        }
    }
}

impl LineageConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    //blank values are treated as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut cfg = LineageConfig::default();

        if let Some(dir) = get("LINEAGE_DATA_DIR") {
            cfg.data_dir = PathBuf::from(dir);
        }
        if let Some(sheet) = get("LINEAGE_DEFAULT_SHEET") {
            cfg.default_sheet = sheet;
        }
        if let Some(format) = get("LINEAGE_FORMAT") {
            cfg.format = format.parse()?;
        }

        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn mk_env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let cfg = LineageConfig::from_lookup(|_| None).unwrap();
        assert_eq!(cfg, LineageConfig::default());
        assert_eq!(cfg.default_sheet, "lazlo-sarai-strange");
    }

    #[test]
    fn env_overrides_and_blank_values_are_ignored() {
        let env = mk_env(&[
            ("LINEAGE_DATA_DIR", "/srv/sheets"),
            ("LINEAGE_DEFAULT_SHEET", "  "),
            ("LINEAGE_FORMAT", "TOON"),
        ]);
        let cfg = LineageConfig::from_lookup(|k| env.get(k).cloned()).unwrap();

        assert_eq!(cfg.data_dir, PathBuf::from("/srv/sheets"));
        assert_eq!(cfg.default_sheet, DEFAULT_SHEET);
        assert_eq!(cfg.format, OutputFormat::Toon);
    }

    #[test]
    fn bad_format_is_an_error() {
        let env = mk_env(&[("LINEAGE_FORMAT", "yaml")]);
        assert_eq!(
            LineageConfig::from_lookup(|k| env.get(k).cloned()).unwrap_err(),
            ConfigError::InvalidFormat("yaml".into())
        );
    }
}
