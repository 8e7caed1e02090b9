// node/edge container handed to the renderer
use std::collections::HashMap;

use serde::Serialize;

use crate::core::error::LineageError;
use crate::core::style::NodeStyle;
use crate::core::types::{EdgeId, EdgeKind, Gender, NodeId, NodeKind, ReproductionMethod};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    Individual {
        gender: Option<Gender>,
        description: Option<String>,
    },
    Union {
        method: ReproductionMethod,
        parent1: String,
        parent2: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    pub label: String,
    pub data: NodeData,
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self.data {
            NodeData::Individual { .. } => NodeKind::Individual,
            NodeData::Union { .. } => NodeKind::Union,
        }
    }

    //true for a union whose two parents are a and b (any order)
    pub fn joins(&self, a: &str, b: &str) -> bool {
        match &self.data {
            NodeData::Union { parent1, parent2: Some(parent2), .. } => {
                (parent1 == a && parent2 == b) || (parent1 == b && parent2 == a)
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    pub kind: EdgeKind,
}

/// Parents -> union -> children graph.
///
/// Nodes and edges keep insertion order; both are keyed by id and re-adding an
/// existing id is a no-op, so repeated traversals never duplicate anything.
#[derive(Debug, Clone, Default)]
pub struct UnionGraph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    node_index: HashMap<NodeId, usize>,
    edge_index: HashMap<EdgeId, usize>,
}

impl UnionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = node.id.clone();
        if !self.node_index.contains_key(&id) {
            self.node_index.insert(id.clone(), self.nodes.len());
            self.nodes.push(node);
        }
        id
    }

    /// Add `source -> target`. The id is `{source}-{target}`; both endpoints
    /// must already be in the graph.
    pub fn add_edge(&mut self, source: &str, target: &str, kind: EdgeKind) -> Result<EdgeId, LineageError> {
        let id = format!("{}-{}", source, target);
        if self.edge_index.contains_key(&id) {
            return Ok(id);
        }

        for endpoint in [source, target] {
            if !self.node_index.contains_key(endpoint) {
                return Err(LineageError::dangling(&id, endpoint));
            }
        }

        self.edge_index.insert(id.clone(), self.edges.len());
        self.edges.push(Edge {
            id: id.clone(),
            source: source.to_string(),
            target: target.to_string(),
            kind,
        });
        Ok(id)
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.node_index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edge_index.get(id).map(|&i| &self.edges[i])
    }

    pub fn union_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.kind() == NodeKind::Union)
    }

    pub fn has_union_between(&self, a: &str, b: &str) -> bool {
        self.union_nodes().any(|n| n.joins(a, b))
    }

    pub fn edges_into(&self, id: &str) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(move |e| e.target == id)
    }

    pub fn edges_from(&self, id: &str) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(move |e| e.source == id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn to_render(&self) -> RenderGraph {
        RenderGraph {
            nodes: self.nodes.iter().map(RenderNode::from).collect(),
            edges: self.edges.iter().map(RenderEdge::from).collect(),
        }
    }
}

/// What the rendering collaborator consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderGraph {
    pub nodes: Vec<RenderNode>,
    pub edges: Vec<RenderEdge>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderNode {
    pub id: NodeId,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reproduction_method: Option<ReproductionMethod>,
    pub style: NodeStyle,
}

impl From<&Node> for RenderNode {
    fn from(n: &Node) -> Self {
        match &n.data {
            NodeData::Individual { gender, description } => RenderNode {
                id: n.id.clone(),
                label: n.label.clone(),
                kind: NodeKind::Individual,
                gender: *gender,
                description: description.clone(),
                reproduction_method: None,
                style: NodeStyle::for_gender(*gender),
            },
            NodeData::Union { method, .. } => RenderNode {
                id: n.id.clone(),
                label: n.label.clone(),
                kind: NodeKind::Union,
                gender: None,
                description: None,
                reproduction_method: Some(method.clone()),
                style: NodeStyle::for_method(method),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderEdge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    #[serde(rename = "type")]
    pub kind: EdgeKind,
}

impl From<&Edge> for RenderEdge {
    fn from(e: &Edge) -> Self {
        RenderEdge {
            id: e.id.clone(),
            source: e.source.clone(),
            target: e.target.clone(),
            kind: e.kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mk_person(id: &str, name: &str) -> Node {
        Node {
            id: id.into(),
            label: name.into(),
            data: NodeData::Individual { gender: None, description: None },
        }
    }

    fn mk_union(id: &str, p1: &str, p2: Option<&str>) -> Node {
        Node {
            id: id.into(),
            label: "Marriage".into(),
            data: NodeData::Union {
                method: ReproductionMethod::Marriage,
                parent1: p1.into(),
                parent2: p2.map(Into::into),
            },
        }
    }

    #[test]
    fn add_node_and_edge_are_idempotent_by_id() {
        let mut g = UnionGraph::new();
        g.add_node(mk_person("member-0", "Alice"));
        g.add_node(mk_person("member-0", "Alice again"));
        g.add_node(mk_union("u", "Alice", None));

        let e1 = g.add_edge("member-0", "u", EdgeKind::Parent).unwrap();
        let e2 = g.add_edge("member-0", "u", EdgeKind::Parent).unwrap();

        assert_eq!(e1, "member-0-u");
        assert_eq!(e1, e2);
        assert_eq!(g.node_count(), 2);
        assert_eq!(g.edge_count(), 1);
        //first insert wins
        assert_eq!(g.node("member-0").unwrap().label, "Alice");
    }

    #[test]
    fn add_edge_rejects_unknown_endpoint() {
        let mut g = UnionGraph::new();
        g.add_node(mk_person("member-0", "Alice"));

        let err = g.add_edge("member-0", "nowhere", EdgeKind::Parent).unwrap_err();
        assert_eq!(err, LineageError::dangling("member-0-nowhere", "nowhere"));
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn has_union_between_ignores_order_and_single_parent_unions() {
        let mut g = UnionGraph::new();
        g.add_node(mk_union("u1", "Alice", Some("Bob")));
        g.add_node(mk_union("u2", "Frank", None));

        assert!(g.has_union_between("Bob", "Alice"));
        assert!(!g.has_union_between("Frank", "Frank"));
    }

    #[test]
    fn render_uses_type_field_names() {
        let mut g = UnionGraph::new();
        g.add_node(mk_person("member-0", "Alice"));
        g.add_node(mk_union("u", "Alice", None));
        g.add_edge("member-0", "u", EdgeKind::Parent).unwrap();

        let json = serde_json::to_value(g.to_render()).unwrap();
        assert_eq!(json["nodes"][0]["type"], "individual");
        assert_eq!(json["nodes"][1]["type"], "union");
        assert_eq!(json["nodes"][1]["reproductionMethod"], "Marriage");
        assert_eq!(json["edges"][0]["type"], "parent");
    }
}
