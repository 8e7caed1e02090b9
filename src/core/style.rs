// display hints carried on render nodes
use serde::Serialize;

use crate::core::types::{Gender, ReproductionMethod};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NodeStyle {
    pub fill: &'static str,
    pub border: &'static str,
}

impl NodeStyle {
    pub fn for_method(method: &ReproductionMethod) -> Self {
        let (fill, border) = match method {
            ReproductionMethod::Marriage => ("#7e22ce", "#581c87"),
            ReproductionMethod::Dating | ReproductionMethod::Hookup => ("#e9d5ff", "#a855f7"),
            ReproductionMethod::PlantSim => ("#22c55e", "#15803d"),
            ReproductionMethod::Clone => ("#fbbf24", "#b45309"),
            ReproductionMethod::Adoption => ("#f97316", "#c2410c"),
            ReproductionMethod::DatingOrMarried => ("#c084fc", "#9333ea"),
            ReproductionMethod::Other(_) => ("#f3e8ff", "#6b21a8"),
        };
        NodeStyle { fill, border }
    }

    //anything not explicitly Male gets the female palette
    pub fn for_gender(gender: Option<Gender>) -> Self {
        match gender {
            Some(Gender::Male) => NodeStyle { fill: "#dbeafe", border: "#2563eb" },
            _ => NodeStyle { fill: "#fce7f3", border: "#db2777" },
        }
    }
}
