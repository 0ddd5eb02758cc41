//! Graph model ingested from edge-list style sources.

use std::collections::HashMap;

use tracing::{debug, instrument};

use crate::domain::entities::{Decoration, MountSpec, NodeData};
use crate::domain::error::{DomainError, DomainResult};

/// Node of a [`Graph`], before any tree structure is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    pub data: NodeData,
    pub mount: Option<MountSpec>,
}

/// Directed edge between two graph nodes, addressed by parse-order index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphEdge {
    pub from: usize,
    pub to: usize,
    pub decoration: Decoration,
}

/// Capability shared by every input format: node ids in parse order, the
/// attributes of each node and the edge list.
pub trait GraphSource {
    /// Node ids in parse order.
    fn node_ids(&self) -> Vec<String>;

    /// Attributes and declared mount point of a node.
    fn attributes(&self, id: &str) -> Option<(NodeData, Option<MountSpec>)>;

    /// Edges as (from id, to id, decoration), in parse order.
    fn edges(&self) -> Vec<(String, String, Decoration)>;
}

/// Node and edge collection. Whether an edge is a tree edge is only decided
/// by the converter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    by_id: HashMap<String, usize>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from any [`GraphSource`].
    #[instrument(level = "debug", skip(source))]
    pub fn from_source(source: &dyn GraphSource) -> DomainResult<Self> {
        let mut graph = Graph::new();
        for id in source.node_ids() {
            let (data, mount) = source
                .attributes(&id)
                .ok_or_else(|| DomainError::UnknownNode(id.clone()))?;
            graph.add_node(data, mount)?;
        }
        for (from, to, decoration) in source.edges() {
            graph.add_edge(&from, &to, decoration)?;
        }
        debug!(
            "graph: {} nodes, {} edges",
            graph.nodes.len(),
            graph.edges.len()
        );
        Ok(graph)
    }

    /// Appends a node; its parse-order index is the current node count.
    pub fn add_node(&mut self, data: NodeData, mount: Option<MountSpec>) -> DomainResult<usize> {
        if self.by_id.contains_key(&data.id) {
            return Err(DomainError::DuplicateNode(data.id));
        }
        let idx = self.nodes.len();
        self.by_id.insert(data.id.clone(), idx);
        self.nodes.push(GraphNode { data, mount });
        Ok(idx)
    }

    pub fn add_edge(&mut self, from: &str, to: &str, decoration: Decoration) -> DomainResult<()> {
        match (self.by_id.get(from), self.by_id.get(to)) {
            (Some(&from), Some(&to)) => {
                self.edges.push(GraphEdge {
                    from,
                    to,
                    decoration,
                });
                Ok(())
            }
            _ => Err(DomainError::DanglingEdge {
                from: from.to_string(),
                to: to.to_string(),
            }),
        }
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// In-degree of every node, indexed by parse order. Self-loops count.
    pub fn in_degrees(&self) -> Vec<usize> {
        let mut degrees = vec![0; self.nodes.len()];
        for edge in &self.edges {
            degrees[edge.to] += 1;
        }
        degrees
    }

    pub(crate) fn into_parts(self) -> (Vec<GraphNode>, Vec<GraphEdge>) {
        (self.nodes, self.edges)
    }
}
