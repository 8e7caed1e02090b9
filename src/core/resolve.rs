// generation assignment over the individual <-> union dependency graph
use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::core::error::LineageError;
use crate::core::normalize::{Dataset, Entity, Individual, Union};
use crate::core::types::NodeId;

pub type Generation = u32;

/// Ordered generation -> entities mapping. Inserting an id that is already in
/// the bucket is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Generations {
    levels: BTreeMap<Generation, Vec<Entity>>,
}

impl Generations {
    pub fn new() -> Self {
        Self::default()
    }

    //returns false if the id was already present in that bucket
    pub fn insert(&mut self, level: Generation, entity: Entity) -> bool {
        let bucket = self.levels.entry(level).or_default();
        if bucket.iter().any(|e| e.id() == entity.id()) {
            return false;
        }
        bucket.push(entity);
        true
    }

    pub fn get(&self, level: Generation) -> &[Entity] {
        self.levels.get(&level).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn level_of(&self, id: &str) -> Option<Generation> {
        self.levels
            .iter()
            .find(|(_, bucket)| bucket.iter().any(|e| e.id() == id))
            .map(|(&level, _)| level)
    }

    /// Move the entity `id` from bucket `from` to the end of bucket `to`.
    /// Returns false (and changes nothing) if it is not in `from`.
    pub fn relocate(&mut self, id: &str, from: Generation, to: Generation) -> bool {
        let Some(bucket) = self.levels.get_mut(&from) else {
            return false;
        };
        let Some(pos) = bucket.iter().position(|e| e.id() == id) else {
            return false;
        };
        let entity = bucket.remove(pos);
        self.insert(to, entity);
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = (Generation, &[Entity])> {
        self.levels.iter().map(|(&l, b)| (l, b.as_slice()))
    }

    pub fn levels(&self) -> impl Iterator<Item = Generation> + '_ {
        self.levels.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.levels.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Output of the resolver: a level per entity id and the grouped mapping.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    levels: HashMap<NodeId, Generation>,
    pub generations: Generations,
}

impl Resolution {
    pub fn level(&self, id: &str) -> Option<Generation> {
        self.levels.get(id).copied()
    }
}

#[derive(Debug, Clone, Copy)]
enum Visit {
    InProgress,
    Done(Generation),
}

//memoized dfs; a node seen again while InProgress is a cycle
struct Resolver<'a> {
    ds: &'a Dataset,
    visits: HashMap<NodeId, Visit>,
    path: Vec<(NodeId, String)>,
}

impl<'a> Resolver<'a> {
    fn new(ds: &'a Dataset) -> Self {
        Resolver { ds, visits: HashMap::new(), path: Vec::new() }
    }

    //Some(level) if already known, None if the caller must compute it
    fn enter(&mut self, id: &str, label: &str) -> Result<Option<Generation>, LineageError> {
        match self.visits.get(id) {
            Some(Visit::Done(level)) => Ok(Some(*level)),
            Some(Visit::InProgress) => {
                let start = self.path.iter().position(|(pid, _)| pid == id).unwrap_or(0);
                let mut path: Vec<String> =
                    self.path[start..].iter().map(|(_, l)| l.clone()).collect();
                path.push(label.to_string());
                Err(LineageError::CyclicDependency { path })
            }
            None => {
                self.visits.insert(id.to_string(), Visit::InProgress);
                self.path.push((id.to_string(), label.to_string()));
                Ok(None)
            }
        }
    }

    fn leave(&mut self, id: &str, level: Generation) -> Generation {
        self.path.pop();
        self.visits.insert(id.to_string(), Visit::Done(level));
        level
    }

    fn individual(&mut self, ind: &'a Individual) -> Result<Generation, LineageError> {
        if let Some(level) = self.enter(&ind.id, &ind.name)? {
            return Ok(level);
        }

        let ds = self.ds;
        let level = match &ind.reproduced_via {
            None => 0,
            Some(method) => {
                let union = ds.union_for(ind).ok_or_else(|| {
                    LineageError::dangling(&ind.name, format!("{} union", method))
                })?;
                1 + self.union(union)?
            }
        };

        Ok(self.leave(&ind.id, level))
    }

    fn union(&mut self, u: &'a Union) -> Result<Generation, LineageError> {
        if let Some(level) = self.enter(&u.id, &u.id)? {
            return Ok(level);
        }

        let ds = self.ds;
        let p1 = ds.require_individual(&u.id, &u.parent1_name)?;
        let mut level = 1 + self.individual(p1)?;

        if let Some(name) = u.parent2_name.as_deref() {
            let p2 = ds.require_individual(&u.id, name)?;
            level = level.max(1 + self.individual(p2)?);
        }

        Ok(self.leave(&u.id, level))
    }
}

/// Assign every individual and union a generation and group them.
///
/// Founders are generation 0, a union sits one above its highest parent and a
/// child one above its union. Any unresolvable reference or cycle fails the
/// whole data set.
#[instrument(skip_all, fields(individuals = ds.individuals.len()))]
pub fn resolve_generations(ds: &Dataset) -> Result<Resolution, LineageError> {
    let mut resolver = Resolver::new(ds);
    let mut levels = HashMap::new();

    for ind in &ds.individuals {
        levels.insert(ind.id.clone(), resolver.individual(ind)?);
    }
    for u in &ds.unions {
        levels.insert(u.id.clone(), resolver.union(u)?);
    }

    let mut generations = Generations::new();
    for entity in ds.entities() {
        let level = levels[entity.id()];
        generations.insert(level, entity);
    }

    debug!(depth = generations.levels().last().unwrap_or(0), "resolved generations");
    Ok(Resolution { levels, generations })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::normalize::{normalize, row};

    fn ids(gens: &Generations, level: Generation) -> Vec<&str> {
        gens.get(level).iter().map(Entity::id).collect()
    }

    #[test]
    fn founders_union_and_child_get_increasing_levels() {
        let ds = normalize(&[
            row(&["Alice", "", "", "", "Female"]),
            row(&["Bob", "", "", "", "Male"]),
            row(&["Carol", "Alice", "Bob", "Marriage", "Female"]),
        ])
        .unwrap();

        let res = resolve_generations(&ds).unwrap();

        assert_eq!(res.level("member-0"), Some(0));
        assert_eq!(res.level("member-1"), Some(0));
        assert_eq!(res.level("Marriage-Alice-Bob"), Some(1));
        assert_eq!(res.level("member-2"), Some(2));
        assert_eq!(ids(&res.generations, 0), vec!["member-0", "member-1"]);
        assert_eq!(ids(&res.generations, 1), vec!["Marriage-Alice-Bob"]);
    }

    #[test]
    fn union_takes_max_of_parents() {
        //Gen0: A, B, D ; A+B -> C (2) ; C+D -> E (4)
        let ds = normalize(&[
            row(&["A"]),
            row(&["B"]),
            row(&["C", "A", "B", "Dating"]),
            row(&["D"]),
            row(&["E", "D", "C", "Marriage"]),
        ])
        .unwrap();

        let res = resolve_generations(&ds).unwrap();
        assert_eq!(res.level("Marriage-C-D"), Some(3));
        assert_eq!(res.level("member-4"), Some(4));
    }

    #[test]
    fn duplicate_union_records_land_once_in_their_bucket() {
        let ds = normalize(&[
            row(&["Alice"]),
            row(&["Bob"]),
            row(&["Carol", "Alice", "Bob", "Marriage"]),
            row(&["Cal", "Bob", "Alice", "Marriage"]),
        ])
        .unwrap();

        let res = resolve_generations(&ds).unwrap();
        assert_eq!(ids(&res.generations, 1), vec!["Marriage-Alice-Bob"]);
        assert_eq!(ids(&res.generations, 2), vec!["member-2", "member-3"]);
    }

    #[test]
    fn hyphenated_names_do_not_share_a_union_level() {
        //Ann-Bob is generation 2, so (Ann-Bob, Cy) sits at 3 while (Ann, Bob-Cy) sits at 1
        let ds = normalize(&[
            row(&["Ann"]),
            row(&["Bob-Cy"]),
            row(&["Cy"]),
            row(&["Zed"]),
            row(&["Q"]),
            row(&["Ann-Bob", "Zed", "Q", "Marriage"]),
            row(&["Kid1", "Ann", "Bob-Cy", "Marriage"]),
            row(&["Kid2", "Ann-Bob", "Cy", "Marriage"]),
        ])
        .unwrap();

        let res = resolve_generations(&ds).unwrap();
        assert_eq!(res.level("Marriage-Ann-Bob%2DCy"), Some(1));
        assert_eq!(res.level("Marriage-Ann%2DBob-Cy"), Some(3));
        assert_eq!(res.level("member-6"), Some(2));
        assert_eq!(res.level("member-7"), Some(4));
        assert_eq!(ids(&res.generations, 3), vec!["Marriage-Ann%2DBob-Cy"]);
    }

    #[test]
    fn missing_parent_is_dangling() {
        let ds = normalize(&[row(&["Kid", "Ghost", "", "Adoption"])]).unwrap();
        let err = resolve_generations(&ds).unwrap_err();
        assert_eq!(
            err,
            LineageError::DanglingReference { referrer: "Adoption-Ghost-".into(), name: "Ghost".into() }
        );
    }

    #[test]
    fn method_without_parent_is_dangling() {
        let ds = normalize(&[row(&["Kid", "", "", "Adoption"])]).unwrap();
        assert!(matches!(
            resolve_generations(&ds).unwrap_err(),
            LineageError::DanglingReference { .. }
        ));
    }

    #[test]
    fn cycles_are_reported_not_overflowed() {
        //A is cloned from B, B is cloned from A
        let ds = normalize(&[row(&["A", "B", "", "Clone"]), row(&["B", "A", "", "Clone"])]).unwrap();

        match resolve_generations(&ds).unwrap_err() {
            LineageError::CyclicDependency { path } => {
                assert_eq!(path.first(), path.last());
                assert!(path.contains(&"Clone-B-".to_string()));
            }
            other => panic!("expected CyclicDependency, got {:?}", other),
        }
    }

    #[test]
    fn relocate_moves_and_is_noop_when_absent() {
        let ds = normalize(&[row(&["Alice"]), row(&["Bob"])]).unwrap();
        let mut gens = resolve_generations(&ds).unwrap().generations;

        assert!(gens.relocate("member-0", 0, 3));
        assert_eq!(ids(&gens, 0), vec!["member-1"]);
        assert_eq!(ids(&gens, 3), vec!["member-0"]);
        assert_eq!(gens.level_of("member-0"), Some(3));

        assert!(!gens.relocate("member-0", 0, 5));
        assert_eq!(gens.len(), 2);
    }
}
