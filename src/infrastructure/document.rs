//! TOML graph document
//!
//! ```toml
//! root = "top"                      # optional
//!
//! [settings]
//! background = "#ffffff"
//!
//! [[node]]
//! id = "top"
//! label = "Top"
//!
//! [[node]]
//! id = "more"
//! mount = { url = "more.toml", now = true }
//!
//! [[edge]]
//! from = "top"
//! to = "more"
//! color = "#ff0000"
//! style = "dash"
//! ```

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{
    graph_to_tree, Decoration, Graph, GraphSource, LineStyle, MountSpec, NodeData, Tree,
};

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct NodeEntry {
    pub id: String,
    pub label: Option<String>,
    pub content: Option<String>,
    pub image: Option<String>,
    pub link: Option<String>,
    pub background_color: Option<String>,
    pub foreground_color: Option<String>,
    pub mount: Option<MountSpec>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct EdgeEntry {
    pub from: String,
    pub to: String,
    pub label: Option<String>,
    pub color: Option<String>,
    pub style: Option<LineStyle>,
    pub image: Option<String>,
}

/// Graph description read from a TOML document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GraphDocument {
    /// Explicit root id; selected from the graph when absent
    pub root: Option<String>,
    pub settings: BTreeMap<String, String>,
    #[serde(rename = "node")]
    pub nodes: Vec<NodeEntry>,
    #[serde(rename = "edge")]
    pub edges: Vec<EdgeEntry>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl GraphDocument {
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        let mut document: GraphDocument = toml::from_str(content)?;
        document.index = document
            .nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.id.clone(), i))
            .collect();
        Ok(document)
    }

    /// Converts the document into a tree rooted at `root`, or at the
    /// selected root when the document does not name one.
    pub fn to_tree(&self) -> ApplicationResult<Tree> {
        let graph = Graph::from_source(self)?;
        graph_to_tree(graph, self.root.as_deref()).map_err(ApplicationError::from)
    }
}

impl GraphSource for GraphDocument {
    fn node_ids(&self) -> Vec<String> {
        self.nodes.iter().map(|n| n.id.clone()).collect()
    }

    fn attributes(&self, id: &str) -> Option<(NodeData, Option<MountSpec>)> {
        let entry = &self.nodes[*self.index.get(id)?];
        let data = NodeData {
            id: entry.id.clone(),
            label: entry.label.clone(),
            content: entry.content.clone(),
            image: entry.image.clone(),
            link: entry.link.clone(),
            background_color: entry.background_color.clone(),
            foreground_color: entry.foreground_color.clone(),
            edge: Decoration::default(),
        };
        Some((data, entry.mount.clone()))
    }

    fn edges(&self) -> Vec<(String, String, Decoration)> {
        self.edges
            .iter()
            .map(|e| {
                let decoration = Decoration {
                    label: e.label.clone(),
                    color: e.color.clone(),
                    style: e.style,
                    image: e.image.clone(),
                };
                (e.from.clone(), e.to.clone(), decoration)
            })
            .collect()
    }
}
