//! Domain entities: node payloads, edges and mount points

use std::fmt;

use generational_arena::Index;
use serde::{Deserialize, Serialize};

/// Line style used to draw an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    Solid,
    Dash,
    Dot,
}

/// Display attributes of an edge.
///
/// Tree edges carry no object of their own: their decoration is stored on the
/// child node (see [`NodeData::edge`]). Non-tree edges carry it on [`Edge`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Decoration {
    pub label: Option<String>,
    pub color: Option<String>,
    pub style: Option<LineStyle>,
    pub image: Option<String>,
}

impl Decoration {
    pub fn is_empty(&self) -> bool {
        self.label.is_none() && self.color.is_none() && self.style.is_none() && self.image.is_none()
    }
}

/// Declared mount point of a node, as read from a source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MountSpec {
    /// Source to resolve, interpreted by the provider like a `link`
    pub url: String,
    /// Mount eagerly at load time instead of on user interaction
    #[serde(default)]
    pub now: bool,
}

/// Data payload for tree nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeData {
    /// Identifier, unique within its tree
    pub id: String,
    pub label: Option<String>,
    pub content: Option<String>,
    pub image: Option<String>,
    pub link: Option<String>,
    pub background_color: Option<String>,
    pub foreground_color: Option<String>,
    /// Decoration of the tree edge leading into this node
    pub edge: Decoration,
}

impl NodeData {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Label if present, id otherwise.
    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Identity of an edge within one tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub u64);

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Non-tree edge between two nodes of the same arena. Does not own its nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub id: EdgeId,
    pub from: Index,
    pub to: Index,
    pub decoration: Decoration,
}

/// Mount state attached to a node.
///
/// A node without a mount point is unmounted. `Mounting` marks a placeholder,
/// `Mounted` marks the root of a grafted subtree. Both sides reference each
/// other while grafted so the graft can be reversed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountPoint {
    Mounting {
        url: String,
        now: bool,
        /// Root of the grafted subtree, while grafted
        mounted: Option<Index>,
    },
    Mounted {
        /// Placeholder this subtree replaced
        mounting: Index,
        /// Edges imported together with this subtree
        edges: Vec<EdgeId>,
    },
}

impl MountPoint {
    pub fn is_mounting(&self) -> bool {
        matches!(self, MountPoint::Mounting { .. })
    }

    pub fn is_mounted(&self) -> bool {
        matches!(self, MountPoint::Mounted { .. })
    }
}

/// Deferred mount request for a placeholder node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountTask {
    pub node: Index,
    pub url: String,
    pub now: bool,
}
