//! Graph to tree conversion: root selection and cycle-safe traversal.

use std::collections::VecDeque;

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::graph::Graph;
use crate::domain::tree::Tree;

/// Picks the root of `graph` by parse-order index.
///
/// Prefers nodes without incoming edges, the first one in parse order if
/// there are several. A purely cyclic graph falls back to the node with the
/// lowest in-degree, again the first one in parse order on ties.
pub fn select_root(graph: &Graph) -> DomainResult<usize> {
    graph
        .in_degrees()
        .into_iter()
        .enumerate()
        .min_by_key(|&(idx, degree)| (degree, idx))
        .map(|(idx, _)| idx)
        .ok_or(DomainError::EmptyGraph)
}

/// Converts `graph` into a tree rooted at `root`, or at [`select_root`] when
/// no root is given.
///
/// Edges are followed breadth-first in edge order. The edge that first reaches
/// a node becomes its tree edge and its decoration moves onto the child. Every
/// other edge between reached nodes is kept as a non-tree edge. Nodes not
/// reachable from the root are dropped, so the result is always one tree.
#[instrument(level = "debug", skip(graph))]
pub fn graph_to_tree(graph: Graph, root: Option<&str>) -> DomainResult<Tree> {
    let root_idx = match root {
        Some(id) => graph
            .index_of(id)
            .ok_or_else(|| DomainError::UnknownNode(id.to_string()))?,
        None => select_root(&graph)?,
    };

    let (nodes, edges) = graph.into_parts();
    let mut outgoing: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    for (edge_idx, edge) in edges.iter().enumerate() {
        outgoing[edge.from].push(edge_idx);
    }

    let mut slots: Vec<_> = nodes.into_iter().map(Some).collect();
    let mut placed: Vec<Option<Index>> = vec![None; slots.len()];

    let Some(root_node) = slots[root_idx].take() else {
        return Err(DomainError::EmptyGraph);
    };
    let mut mounts = vec![None; slots.len()];
    mounts[root_idx] = root_node.mount;
    let mut tree = Tree::new(root_node.data);
    placed[root_idx] = tree.root();

    let mut non_tree = Vec::new();
    let mut queue = VecDeque::from([root_idx]);
    while let Some(current) = queue.pop_front() {
        let Some(parent) = placed[current] else {
            continue;
        };
        for &edge_idx in &outgoing[current] {
            let edge = &edges[edge_idx];
            match slots[edge.to].take() {
                Some(mut child) => {
                    child.data.edge = edge.decoration.clone();
                    mounts[edge.to] = child.mount;
                    placed[edge.to] = Some(tree.add_child(parent, child.data));
                    queue.push_back(edge.to);
                }
                None => non_tree.push(edge_idx),
            }
        }
    }

    for edge_idx in non_tree {
        let edge = &edges[edge_idx];
        if let (Some(from), Some(to)) = (placed[edge.from], placed[edge.to]) {
            tree.add_edge(from, to, edge.decoration.clone());
        }
    }

    // Mount tasks are queued in parse order, once every edge exists
    for (graph_idx, mount) in mounts.into_iter().enumerate() {
        if let (Some(node), Some(spec)) = (placed[graph_idx], mount) {
            tree.declare_mount(node, spec.url, spec.now);
        }
    }

    let dropped = placed.iter().filter(|p| p.is_none()).count();
    if dropped > 0 {
        debug!("dropped {} nodes unreachable from the root", dropped);
    }
    debug!(
        "converted: {} nodes, {} non-tree edges, {} mount tasks",
        tree.nodes().len(),
        tree.edges().len(),
        tree.pending_mount_tasks()
    );
    Ok(tree)
}
