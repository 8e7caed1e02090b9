// normalize -> resolve -> build -> partnerships -> reconcile
use tracing::{info, instrument};

use crate::core::build::build_union_graph;
use crate::core::error::LineageError;
use crate::core::graph::UnionGraph;
use crate::core::normalize::{Dataset, RawRow, normalize};
use crate::core::reconcile::reconcile;
use crate::core::resolve::{Generations, resolve_generations};
use crate::core::types::NodeId;

/// Everything one computation produces for a row snapshot.
#[derive(Debug, Clone)]
pub struct FamilyTree {
    pub dataset: Dataset,
    /// Generation buckets after partner reconciliation.
    pub generations: Generations,
    pub graph: UnionGraph,
    pub relocated: Vec<NodeId>,
}

/// Run the whole computation. Either every stage succeeds or the first error
/// is returned; there is no partial tree.
#[instrument(skip_all, fields(rows = rows.len()))]
pub fn compute(rows: &[RawRow]) -> Result<FamilyTree, LineageError> {
    let dataset = normalize(rows)?;
    compute_dataset(dataset)
}

fn compute_dataset(dataset: Dataset) -> Result<FamilyTree, LineageError> {
    let resolution = resolve_generations(&dataset)?;

    let mut graph = build_union_graph(&dataset)?;
    graph.add_partnerships(&dataset)?;

    let mut generations = resolution.generations.clone();
    let relocated = reconcile(&mut generations, &dataset, &resolution)?;

    info!(
        individuals = dataset.individuals.len(),
        generations = generations.levels().count(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        relocated = relocated.len(),
        "family tree computed"
    );

    Ok(FamilyTree { dataset, generations, graph, relocated })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::normalize::row;

    #[test]
    fn empty_snapshot_gives_empty_tree() {
        let tree = compute(&[]).unwrap();
        assert!(tree.generations.is_empty());
        assert_eq!(tree.graph.node_count(), 0);
    }

    #[test]
    fn failure_in_any_stage_aborts_everything() {
        let rows = vec![row(&["Alice", "", "", "", "Female", "Ghost"])];
        assert_eq!(compute(&rows).unwrap_err(), LineageError::dangling("Alice", "Ghost"));
    }
}
