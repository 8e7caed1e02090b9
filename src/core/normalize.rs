// row snapshot -> typed individuals + unions
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::error::LineageError;
use crate::core::types::{Gender, NodeId, ReproductionMethod, join_id, pair_key};

/// One spreadsheet row: `[name, parent1Name, parent2Name, reproducedVia,
/// gender, currentPartner, narrativeDescription]`. Missing trailing cells
/// are absent values.
pub type RawRow = Vec<Option<String>>;

pub const ROW_WIDTH: usize = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Individual {
    pub id: NodeId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent1_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent2_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reproduced_via: Option<ReproductionMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_partner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narrative_description: Option<String>,
}

impl Individual {
    pub fn is_founder(&self) -> bool {
        self.reproduced_via.is_none()
    }

    //key of the union this individual came from, if any
    pub fn union_key(&self) -> Option<UnionKey> {
        let method = self.reproduced_via.clone()?;
        let p1 = self.parent1_name.as_deref().unwrap_or("");
        Some(UnionKey::new(method, p1, self.parent2_name.as_deref()))
    }
}

/// A reproductive (or partnership) event between one or two parents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Union {
    pub id: NodeId,
    //empty when the source row had a method but no first parent
    pub parent1_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent2_name: Option<String>,
    pub reproduction_method: ReproductionMethod,
}

impl Union {
    pub fn new(method: ReproductionMethod, parent1: &str, parent2: Option<&str>) -> Self {
        let key = UnionKey::new(method, parent1, parent2);
        Union {
            id: key.id(),
            parent1_name: parent1.to_string(),
            parent2_name: parent2.map(str::to_string),
            reproduction_method: key.method,
        }
    }

    pub fn key(&self) -> UnionKey {
        UnionKey::new(
            self.reproduction_method.clone(),
            &self.parent1_name,
            self.parent2_name.as_deref(),
        )
    }

    pub fn parent_names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.parent1_name.as_str()).chain(self.parent2_name.as_deref())
    }

    /// True when `a` and `b` are this union's two parents, in either order.
    pub fn joins(&self, a: &str, b: &str) -> bool {
        match self.parent2_name.as_deref() {
            Some(p2) => (self.parent1_name == a && p2 == b) || (self.parent1_name == b && p2 == a),
            None => false,
        }
    }
}

/// Identity of a union: method plus the unordered parent pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnionKey {
    pub method: ReproductionMethod,
    pub parents: (String, String),
}

impl UnionKey {
    pub fn new(method: ReproductionMethod, parent1: &str, parent2: Option<&str>) -> Self {
        UnionKey { method, parents: pair_key(parent1, parent2) }
    }

    pub fn id(&self) -> NodeId {
        join_id(&[self.method.as_str(), &self.parents.0, &self.parents.1])
    }
}

/// Closed set of things that get a generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Entity {
    Individual(Individual),
    Union(Union),
}

impl Entity {
    pub fn id(&self) -> &str {
        match self {
            Entity::Individual(i) => &i.id,
            Entity::Union(u) => &u.id,
        }
    }
}

/// The normalized, immutable snapshot every later stage reads from.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub individuals: Vec<Individual>,
    //one per child row, so the same logical union can appear several times
    pub unions: Vec<Union>,
    by_name: HashMap<String, usize>,
    by_key: HashMap<UnionKey, usize>,
}

impl Dataset {
    pub fn individual(&self, name: &str) -> Option<&Individual> {
        self.by_name.get(name).map(|&i| &self.individuals[i])
    }

    //lookup that treats a miss (or a blank name) as fatal
    pub fn require_individual(&self, referrer: &str, name: &str) -> Result<&Individual, LineageError> {
        self.individual(name)
            .ok_or_else(|| LineageError::dangling(referrer, name))
    }

    pub fn union_for(&self, individual: &Individual) -> Option<&Union> {
        let key = individual.union_key()?;
        self.by_key.get(&key).map(|&i| &self.unions[i])
    }

    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.individuals
            .iter()
            .cloned()
            .map(Entity::Individual)
            .chain(self.unions.iter().cloned().map(Entity::Union))
    }
}

fn clean(cell: Option<&Option<String>>) -> Option<String> {
    let s = cell?.as_deref()?.trim();
    if s.is_empty() { None } else { Some(s.to_string()) }
}

/// Turn raw rows into a `Dataset`.
///
/// Ids are `member-{row index}`. Every row with a reproduction method also
/// yields a `Union`; a missing first parent is accepted here and surfaces as a
/// dangling reference during resolution.
pub fn normalize(rows: &[RawRow]) -> Result<Dataset, LineageError> {
    let mut ds = Dataset::default();

    for (index, row) in rows.iter().enumerate() {
        if row.len() > ROW_WIDTH {
            return Err(LineageError::MalformedRow {
                row: index,
                reason: format!("expected at most {} cells, found {}", ROW_WIDTH, row.len()),
            });
        }

        let cells: [Option<String>; ROW_WIDTH] = std::array::from_fn(|c| clean(row.get(c)));
        if cells.iter().all(Option::is_none) {
            //trailing blank spreadsheet rows
            continue;
        }

        let [name, parent1, parent2, via, gender, partner, description] = cells;

        let name = name.ok_or_else(|| LineageError::MalformedRow {
            row: index,
            reason: "name is blank".into(),
        })?;

        let id = format!("member-{}", index);

        if let Some(&prev) = ds.by_name.get(&name) {
            return Err(LineageError::DuplicateName {
                name,
                first: ds.individuals[prev].id.clone(),
                second: id,
            });
        }

        let parsed_gender = gender.as_deref().and_then(Gender::parse);
        if gender.is_some() && parsed_gender.is_none() {
            warn!(row = index, name = %name, value = ?gender, "unrecognised gender, leaving it unset");
        }

        let reproduced_via = via.as_deref().map(ReproductionMethod::from_label);

        if let Some(method) = reproduced_via.clone() {
            let union = Union::new(method, parent1.as_deref().unwrap_or(""), parent2.as_deref());
            ds.by_key.entry(union.key()).or_insert(ds.unions.len());
            ds.unions.push(union);
        }

        ds.by_name.insert(name.clone(), ds.individuals.len());
        ds.individuals.push(Individual {
            id,
            name,
            parent1_name: parent1,
            parent2_name: parent2,
            reproduced_via,
            gender: parsed_gender,
            current_partner: partner,
            narrative_description: description,
        });
    }

    debug!(individuals = ds.individuals.len(), unions = ds.unions.len(), "normalized rows");
    Ok(ds)
}

/// Convenience for building rows from string slices; `""` means absent.
pub fn row(cells: &[&str]) -> RawRow {
    cells.iter().map(|c| Some(c.to_string())).collect()
}
