//! Shared helpers for integration tests
#![allow(dead_code)]

use std::collections::{BTreeSet, HashMap, HashSet};

use url::Url;

use graftree::application::{Parameters, Provider};
use graftree::domain::{graph_to_tree, Decoration, Graph, MountSpec, NodeData, Tree};

/// Graph from node ids and (from, to) edges, in the given order.
pub fn graph(nodes: &[&str], edges: &[(&str, &str)]) -> Graph {
    let mut graph = Graph::new();
    for id in nodes {
        graph.add_node(NodeData::new(*id), None).expect("unique ids");
    }
    for (from, to) in edges {
        graph
            .add_edge(from, to, Decoration::default())
            .expect("known endpoints");
    }
    graph
}

/// Graph whose nodes may declare a mount point as (url, now).
pub fn graph_with_mounts(nodes: &[(&str, Option<(&str, bool)>)], edges: &[(&str, &str)]) -> Graph {
    let mut graph = Graph::new();
    for (id, mount) in nodes {
        let mount = mount.map(|(url, now)| MountSpec {
            url: url.to_string(),
            now,
        });
        graph.add_node(NodeData::new(*id), mount).expect("unique ids");
    }
    for (from, to) in edges {
        graph
            .add_edge(from, to, Decoration::default())
            .expect("known endpoints");
    }
    graph
}

pub fn tree(nodes: &[&str], edges: &[(&str, &str)]) -> Tree {
    graph_to_tree(graph(nodes, edges), None).expect("non-empty graph")
}

/// (id, parent id, children ids) of every attached node, pre-order.
pub fn outline(tree: &Tree) -> Vec<(String, Option<String>, Vec<String>)> {
    tree.nodes()
        .iter()
        .map(|(_, node)| {
            let parent = node
                .parent
                .and_then(|p| tree.node(p))
                .map(|p| p.data.id.clone());
            let children = node
                .children
                .iter()
                .filter_map(|&c| tree.node(c))
                .map(|c| c.data.id.clone())
                .collect();
            (node.data.id.clone(), parent, children)
        })
        .collect()
}

pub fn children_of(tree: &Tree, id: &str) -> Vec<String> {
    let idx = tree.find(id).unwrap_or_else(|| panic!("node {id} not attached"));
    tree.node(idx)
        .unwrap()
        .children
        .iter()
        .map(|&c| tree.node(c).unwrap().data.id.clone())
        .collect()
}

/// Non-tree edges as (from id, to id).
pub fn edge_set(tree: &Tree) -> BTreeSet<(String, String)> {
    tree.edges()
        .iter()
        .map(|e| {
            (
                tree.node(e.from).unwrap().data.id.clone(),
                tree.node(e.to).unwrap().data.id.clone(),
            )
        })
        .collect()
}

/// In-memory provider with recursion detection on source names.
#[derive(Default)]
pub struct StubProvider {
    pub sources: HashMap<String, Tree>,
    pub visited: HashSet<String>,
    pub requests: Vec<(String, bool)>,
}

impl StubProvider {
    pub fn with(mut self, source: &str, tree: Tree) -> Self {
        self.sources.insert(source.to_string(), tree);
        self
    }

    /// Marks `source` as loaded, as if it were the document being shown.
    pub fn visiting(mut self, source: &str) -> Self {
        self.visited.insert(source.to_string());
        self
    }
}

impl Provider for StubProvider {
    fn make_tree(
        &mut self,
        source: Option<&str>,
        _base: Option<&Url>,
        _parameters: &Parameters,
        check_recursion: bool,
    ) -> Option<Tree> {
        let source = source?.to_string();
        self.requests.push((source.clone(), check_recursion));
        let fresh = self.visited.insert(source.clone());
        if check_recursion && !fresh {
            return None;
        }
        self.sources.get(&source).cloned()
    }
}
