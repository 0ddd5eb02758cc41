//! Tree: arena of nodes with a single root, a flat list of non-tree edges and
//! the mount tasks queued while the tree was built.

use std::collections::{HashMap, VecDeque};

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::domain::arena::{TreeArena, TreeNode};
use crate::domain::entities::{Decoration, Edge, EdgeId, MountPoint, MountTask, NodeData};

/// One-shot queue of mount tasks, taken from a freshly built tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MountQueue {
    tasks: VecDeque<MountTask>,
}

impl MountQueue {
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    fn push(&mut self, task: MountTask) {
        self.tasks.push_back(task);
    }
}

impl Iterator for MountQueue {
    type Item = MountTask;

    fn next(&mut self) -> Option<Self::Item> {
        self.tasks.pop_front()
    }
}

/// Subtree moved into a host tree by [`Tree::adopt`], ready to be grafted.
#[derive(Debug, Clone)]
pub struct Adopted {
    /// Detached root of the subtree, now in the host arena
    pub root: Index,
    /// Non-tree edges of the subtree, re-identified for the host tree
    pub edges: Vec<Edge>,
}

#[derive(Debug, Clone, Default)]
pub struct Tree {
    nodes: TreeArena,
    edges: Vec<Edge>,
    next_edge_id: u64,
    mount_tasks: MountQueue,
}

impl Tree {
    /// Creates a tree holding only a root node.
    pub fn new(root: NodeData) -> Self {
        let mut nodes = TreeArena::new();
        nodes.insert_node(root, None);
        Self {
            nodes,
            ..Self::default()
        }
    }

    pub fn root(&self) -> Option<Index> {
        self.nodes.root()
    }

    pub fn nodes(&self) -> &TreeArena {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut TreeArena {
        &mut self.nodes
    }

    pub fn node(&self, idx: Index) -> Option<&TreeNode> {
        self.nodes.get_node(idx)
    }

    pub fn find(&self, id: &str) -> Option<Index> {
        self.nodes.find(id)
    }

    pub fn add_child(&mut self, parent: Index, data: NodeData) -> Index {
        self.nodes.insert_node(data, Some(parent))
    }

    /// Non-tree edges, in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn add_edge(&mut self, from: Index, to: Index, decoration: Decoration) -> EdgeId {
        let id = self.next_edge_id();
        self.edges.push(Edge {
            id,
            from,
            to,
            decoration,
        });
        id
    }

    pub(crate) fn push_edges(&mut self, edges: impl IntoIterator<Item = Edge>) {
        self.edges.extend(edges);
    }

    pub(crate) fn remove_edges(&mut self, ids: &[EdgeId]) -> usize {
        let before = self.edges.len();
        self.edges.retain(|e| !ids.contains(&e.id));
        before - self.edges.len()
    }

    fn next_edge_id(&mut self) -> EdgeId {
        let id = EdgeId(self.next_edge_id);
        self.next_edge_id += 1;
        id
    }

    pub fn mount_point(&self, idx: Index) -> Option<&MountPoint> {
        self.node(idx)?.mount.as_ref()
    }

    /// Attaches a Mounting mount point to `node` and queues its mount task.
    pub fn declare_mount(&mut self, node: Index, url: impl Into<String>, now: bool) -> bool {
        let url = url.into();
        let Some(target) = self.nodes.get_node_mut(node) else {
            return false;
        };
        target.mount = Some(MountPoint::Mounting {
            url: url.clone(),
            now,
            mounted: None,
        });
        self.mount_tasks.push(MountTask { node, url, now });
        true
    }

    /// Number of mount tasks not yet taken.
    pub fn pending_mount_tasks(&self) -> usize {
        self.mount_tasks.len()
    }

    /// Takes the mount tasks. The queue is handed out once; later calls get an
    /// empty queue.
    pub fn take_mount_tasks(&mut self) -> MountQueue {
        std::mem::take(&mut self.mount_tasks)
    }

    /// Moves all nodes and edges of `other` into this tree's arena.
    ///
    /// The root of `other` is inserted detached. Node indices and edge ids are
    /// remapped, mount point cross-references included. Pending mount tasks of
    /// `other` are discarded. Returns None when `other` is empty.
    #[instrument(level = "debug", skip(self, other))]
    pub fn adopt(&mut self, mut other: Tree) -> Option<Adopted> {
        let other_root = other.root()?;

        let drained = other.nodes.drain();
        let mut index_map: HashMap<Index, Index> = HashMap::with_capacity(drained.len());
        let mut inserted = Vec::with_capacity(drained.len());
        for (old, node) in drained {
            let new = self.nodes.insert_detached(node);
            index_map.insert(old, new);
            inserted.push(new);
        }

        let mut edge_map: HashMap<EdgeId, EdgeId> = HashMap::with_capacity(other.edges.len());
        let mut edges = Vec::with_capacity(other.edges.len());
        for edge in other.edges {
            let (Some(&from), Some(&to)) = (index_map.get(&edge.from), index_map.get(&edge.to))
            else {
                continue;
            };
            let id = self.next_edge_id();
            edge_map.insert(edge.id, id);
            edges.push(Edge {
                id,
                from,
                to,
                decoration: edge.decoration,
            });
        }

        for idx in inserted {
            if let Some(node) = self.nodes.get_node_mut(idx) {
                node.parent = node.parent.and_then(|p| index_map.get(&p).copied());
                node.children = node
                    .children
                    .iter()
                    .filter_map(|c| index_map.get(c).copied())
                    .collect();
                node.mount = node
                    .mount
                    .take()
                    .and_then(|m| remap_mount(m, &index_map, &edge_map));
            }
        }

        let root = *index_map.get(&other_root)?;
        debug!(
            "adopted {} nodes and {} edges",
            index_map.len(),
            edges.len()
        );
        Some(Adopted { root, edges })
    }

    /// Removes the subtree rooted at `idx` from the arena, together with the
    /// placeholders replaced by grafts inside it. Returns the number of nodes
    /// released.
    pub(crate) fn release(&mut self, idx: Index) -> usize {
        let mut released = 0;
        let mut stack = vec![idx];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(current) {
                released += 1;
                stack.extend(node.children);
                if let Some(MountPoint::Mounted { mounting, .. }) = node.mount {
                    stack.push(mounting);
                }
            }
        }
        released
    }
}

fn remap_mount(
    mount: MountPoint,
    index_map: &HashMap<Index, Index>,
    edge_map: &HashMap<EdgeId, EdgeId>,
) -> Option<MountPoint> {
    match mount {
        MountPoint::Mounting { url, now, mounted } => Some(MountPoint::Mounting {
            url,
            now,
            mounted: mounted.and_then(|m| index_map.get(&m).copied()),
        }),
        MountPoint::Mounted { mounting, edges } => Some(MountPoint::Mounted {
            mounting: *index_map.get(&mounting)?,
            edges: edges
                .iter()
                .filter_map(|e| edge_map.get(e).copied())
                .collect(),
        }),
    }
}
