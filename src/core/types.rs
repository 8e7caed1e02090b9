// shared ids and small enums
use std::fmt;

use serde::{Deserialize, Serialize};

pub type NodeId = String;
pub type EdgeId = String;

//synthetic method for couples with no recorded union
pub const DATING_OR_MARRIED: &str = "Dating or Married";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Case-insensitive parse of a spreadsheet cell. Unknown values give `None`.
    pub fn parse(cell: &str) -> Option<Gender> {
        match cell.trim().to_ascii_lowercase().as_str() {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            _ => None,
        }
    }
}

/// How a union produced (or would produce) children.
///
/// The named variants are the values the display layer knows how to style;
/// anything else is kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum ReproductionMethod {
    Marriage,
    Dating,
    Hookup,
    PlantSim,
    Clone,
    Adoption,
    DatingOrMarried,
    Other(String),
}

impl ReproductionMethod {
    pub fn from_label(label: &str) -> Self {
        match label {
            "Marriage" => ReproductionMethod::Marriage,
            "Dating" => ReproductionMethod::Dating,
            "Hookup" => ReproductionMethod::Hookup,
            "Plant sim" => ReproductionMethod::PlantSim,
            "Clone" => ReproductionMethod::Clone,
            "Adoption" => ReproductionMethod::Adoption,
            DATING_OR_MARRIED => ReproductionMethod::DatingOrMarried,
            other => ReproductionMethod::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ReproductionMethod::Marriage => "Marriage",
            ReproductionMethod::Dating => "Dating",
            ReproductionMethod::Hookup => "Hookup",
            ReproductionMethod::PlantSim => "Plant sim",
            ReproductionMethod::Clone => "Clone",
            ReproductionMethod::Adoption => "Adoption",
            ReproductionMethod::DatingOrMarried => DATING_OR_MARRIED,
            ReproductionMethod::Other(s) => s,
        }
    }
}

impl fmt::Display for ReproductionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for ReproductionMethod {
    fn from(s: String) -> Self {
        ReproductionMethod::from_label(&s)
    }
}

impl From<ReproductionMethod> for String {
    fn from(m: ReproductionMethod) -> Self {
        m.as_str().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Individual,
    Union,
}

//parent: individual -> union, child: union -> individual
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Parent,
    Child,
}

/// Unordered parent pair used wherever parent order must not matter.
/// `None` for the second slot means a single-parent union.
pub fn pair_key(p1: &str, p2: Option<&str>) -> (String, String) {
    match p2 {
        Some(p2) if p2 < p1 => (p2.to_string(), p1.to_string()),
        Some(p2) => (p1.to_string(), p2.to_string()),
        None => (p1.to_string(), String::new()),
    }
}

/// Join id segments with `-`, escaping `%` and `-` inside each segment so
/// that distinct segment lists never produce the same id.
pub fn join_id(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|p| p.replace('%', "%25").replace('-', "%2D"))
        .collect::<Vec<_>>()
        .join("-")
}
