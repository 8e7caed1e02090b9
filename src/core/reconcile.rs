// move generation-0 partners next to their later-generation partner
use tracing::debug;

use crate::core::error::LineageError;
use crate::core::normalize::{Dataset, Entity};
use crate::core::resolve::{Generations, Resolution};
use crate::core::types::NodeId;

/// Single, non-cascading pass over the generation-0 bucket: an individual
/// whose current partner was resolved to a later generation is moved into that
/// partner's bucket. Partner generations are read from `res` (pre-move), and
/// nothing outside generation 0 is touched.
///
/// Returns the ids that moved, in bucket order.
pub fn reconcile(
    gens: &mut Generations,
    ds: &Dataset,
    res: &Resolution,
) -> Result<Vec<NodeId>, LineageError> {
    //snapshot first, we mutate the bucket while walking it
    let candidates: Vec<(NodeId, String, String)> = gens
        .get(0)
        .iter()
        .filter_map(|e| match e {
            Entity::Individual(ind) => ind
                .current_partner
                .clone()
                .map(|p| (ind.id.clone(), ind.name.clone(), p)),
            Entity::Union(_) => None,
        })
        .collect();

    let mut moved = Vec::new();
    for (id, name, partner_name) in candidates {
        let partner = ds.require_individual(&name, &partner_name)?;
        let target = res
            .level(&partner.id)
            .ok_or_else(|| LineageError::dangling(&name, &partner.id))?;

        if target > 0 && gens.relocate(&id, 0, target) {
            debug!(%name, partner = %partner.name, to = target, "moved next to partner");
            moved.push(id);
        }
    }

    Ok(moved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::normalize::{normalize, row};
    use crate::core::resolve::resolve_generations;

    fn mk_run(rows: Vec<Vec<Option<String>>>) -> (Dataset, Resolution) {
        let ds = normalize(&rows).unwrap();
        let res = resolve_generations(&ds).unwrap();
        (ds, res)
    }

    fn names_at(gens: &Generations, level: u32) -> Vec<String> {
        gens.get(level)
            .iter()
            .filter_map(|e| match e {
                Entity::Individual(i) => Some(i.name.clone()),
                Entity::Union(_) => None,
            })
            .collect()
    }

    #[test]
    fn founder_moves_to_later_partner_generation() {
        let (ds, res) = mk_run(vec![
            row(&["Alice"]),
            row(&["Bob"]),
            row(&["Eli", "Alice", "Bob", "Marriage", "Male", "Dana"]),
            row(&["Dana", "", "", "", "Female", "Eli"]),
        ]);
        let mut gens = res.generations.clone();

        let moved = reconcile(&mut gens, &ds, &res).unwrap();

        assert_eq!(moved, vec!["member-3".to_string()]);
        assert_eq!(names_at(&gens, 0), vec!["Alice", "Bob"]);
        assert_eq!(names_at(&gens, 2), vec!["Eli", "Dana"]);
        //resolution itself is untouched
        assert_eq!(res.level("member-3"), Some(0));
    }

    #[test]
    fn founder_couples_stay_put() {
        let (ds, res) = mk_run(vec![
            row(&["Alice", "", "", "", "Female", "Bob"]),
            row(&["Bob", "", "", "", "Male", "Alice"]),
        ]);
        let mut gens = res.generations.clone();

        assert!(reconcile(&mut gens, &ds, &res).unwrap().is_empty());
        assert_eq!(names_at(&gens, 0), vec!["Alice", "Bob"]);
    }

    #[test]
    fn later_generations_are_never_moved() {
        //Carol (gen 2) partners with Zed (gen 0): Zed moves up, Carol stays
        let (ds, res) = mk_run(vec![
            row(&["Alice"]),
            row(&["Bob"]),
            row(&["Carol", "Alice", "Bob", "Marriage", "Female", "Zed"]),
            row(&["Zed", "", "", "", "Male"]),
        ]);
        let mut gens = res.generations.clone();

        let moved = reconcile(&mut gens, &ds, &res).unwrap();

        assert!(moved.is_empty());
        assert_eq!(names_at(&gens, 2), vec!["Carol"]);
        assert_eq!(names_at(&gens, 0), vec!["Alice", "Bob", "Zed"]);
    }

    #[test]
    fn moves_do_not_cascade() {
        //Yan -> Dana -> Eli(gen 2). Dana moves; Yan looks at Dana's resolved gen (0) and stays.
        let (ds, res) = mk_run(vec![
            row(&["Alice"]),
            row(&["Bob"]),
            row(&["Eli", "Alice", "Bob", "Marriage"]),
            row(&["Dana", "", "", "", "Female", "Eli"]),
            row(&["Yan", "", "", "", "Male", "Dana"]),
        ]);
        let mut gens = res.generations.clone();

        let moved = reconcile(&mut gens, &ds, &res).unwrap();

        assert_eq!(moved, vec!["member-3".to_string()]);
        assert_eq!(names_at(&gens, 0), vec!["Alice", "Bob", "Yan"]);
    }

    #[test]
    fn missing_partner_fails() {
        let (ds, res) = mk_run(vec![row(&["Dana", "", "", "", "Female", "Nobody"])]);
        let mut gens = res.generations.clone();
        assert!(matches!(
            reconcile(&mut gens, &ds, &res).unwrap_err(),
            LineageError::DanglingReference { .. }
        ));
    }
}
