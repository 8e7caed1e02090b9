// union graph construction: dedup unions, wire parents and children
use std::collections::{BTreeMap, HashMap};

use tracing::{debug, instrument};

use crate::core::error::LineageError;
use crate::core::graph::{Node, NodeData, UnionGraph};
use crate::core::normalize::{Dataset, Individual, Union, UnionKey};
use crate::core::types::EdgeKind;

fn individual_node(ind: &Individual) -> Node {
    Node {
        id: ind.id.clone(),
        label: ind.name.clone(),
        data: NodeData::Individual {
            gender: ind.gender,
            description: ind.narrative_description.clone(),
        },
    }
}

fn union_node(u: &Union) -> Node {
    Node {
        id: u.id.clone(),
        label: u.reproduction_method.to_string(),
        data: NodeData::Union {
            method: u.reproduction_method.clone(),
            parent1: u.parent1_name.clone(),
            parent2: u.parent2_name.clone(),
        },
    }
}

/// Deduplicate the dataset's union records by (method, unordered parent pair).
/// The first record in row order represents the group; iteration is in key
/// order so the result does not depend on row order.
pub fn dedup_unions(ds: &Dataset) -> BTreeMap<UnionKey, &Union> {
    let mut unique = BTreeMap::new();
    for u in &ds.unions {
        unique.entry(u.key()).or_insert(u);
    }
    unique
}

/// Build the parents -> union -> children graph (without partnership unions).
///
/// Every individual becomes a node. Each deduplicated union becomes a node with
/// a parent edge from each parent that resolves by name, and a child edge to
/// every individual whose parent pair matches in either order *and* whose
/// `reproducedVia` equals the union's method.
#[instrument(skip_all)]
pub fn build_union_graph(ds: &Dataset) -> Result<UnionGraph, LineageError> {
    let mut g = UnionGraph::new();

    for ind in &ds.individuals {
        g.add_node(individual_node(ind));
    }

    //children grouped by the union they claim to come from
    let mut children: HashMap<UnionKey, Vec<&Individual>> = HashMap::new();
    for ind in &ds.individuals {
        if let Some(key) = ind.union_key() {
            children.entry(key).or_default().push(ind);
        }
    }

    let unique = dedup_unions(ds);
    for (key, u) in &unique {
        let uid = g.add_node(union_node(u));

        for name in u.parent_names() {
            match ds.individual(name) {
                Some(parent) => {
                    g.add_edge(&parent.id, &uid, EdgeKind::Parent)?;
                }
                None => debug!(union = %uid, parent = name, "parent not resolvable, no edge"),
            }
        }

        for child in children.get(key).into_iter().flatten() {
            g.add_edge(&uid, &child.id, EdgeKind::Child)?;
        }
    }

    debug!(nodes = g.node_count(), edges = g.edge_count(), unions = unique.len(), "built union graph");
    Ok(g)
}
