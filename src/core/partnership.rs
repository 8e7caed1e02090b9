// synthetic unions for current partners without a recorded union
use std::collections::HashSet;

use tracing::{debug, warn};

use crate::core::error::LineageError;
use crate::core::graph::{Node, NodeData, UnionGraph};
use crate::core::normalize::Dataset;
use crate::core::types::{DATING_OR_MARRIED, EdgeKind, NodeId, ReproductionMethod, join_id};

pub fn partnership_id(a: &str, b: &str) -> NodeId {
    join_id(&["relationship", a, b])
}

impl UnionGraph {
    /// For every couple linked by `currentPartner` that no union joins as
    /// parents, add a `"Dating or Married"` union with two parent edges and no
    /// children.
    ///
    /// Pairs are keyed by their sorted names so each couple is handled once,
    /// whichever partner's record comes first. Running this again on the same
    /// graph adds nothing. A partner name that does not resolve fails the pass.
    pub fn add_partnerships(&mut self, ds: &Dataset) -> Result<usize, LineageError> {
        let mut seen: HashSet<(String, String)> = HashSet::new();
        let mut added = 0;

        for member in &ds.individuals {
            let Some(partner_name) = member.current_partner.as_deref() else {
                continue;
            };
            let partner = ds.require_individual(&member.name, partner_name)?;

            if partner.name == member.name {
                warn!(name = %member.name, "individual lists themselves as current partner, skipping");
                continue;
            }

            let (first, second) = if member.name <= partner.name {
                (member, partner)
            } else {
                (partner, member)
            };

            if !seen.insert((first.name.clone(), second.name.clone())) {
                continue;
            }

            //covers recorded unions and partnerships from an earlier pass
            if self.has_union_between(&first.name, &second.name) {
                continue;
            }

            let rid = self.add_node(Node {
                id: partnership_id(&first.name, &second.name),
                label: DATING_OR_MARRIED.to_string(),
                data: NodeData::Union {
                    method: ReproductionMethod::DatingOrMarried,
                    parent1: first.name.clone(),
                    parent2: Some(second.name.clone()),
                },
            });
            self.add_edge(&first.id, &rid, EdgeKind::Parent)?;
            self.add_edge(&second.id, &rid, EdgeKind::Parent)?;
            added += 1;
        }

        debug!(added, "partnership pass");
        Ok(added)
    }
}
