use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::entities::{MountPoint, NodeData};

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug, Clone)]
pub struct TreeNode {
    /// Attributes of this node
    pub data: NodeData,
    /// Mount state, None for unmounted nodes
    pub mount: Option<MountPoint>,
    /// Index of parent node in the arena, None for the root and detached nodes
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena
    pub children: Vec<Index>,
}

impl TreeNode {
    pub fn new(data: NodeData) -> Self {
        Self {
            data,
            mount: None,
            parent: None,
            children: Vec::new(),
        }
    }
}

/// Arena-based tree structure.
///
/// Uses generational arena for memory-safe node references and O(1) lookups.
/// Besides the nodes reachable from the root, the arena may hold detached
/// nodes: placeholders replaced by a graft, or adopted subtrees not yet grafted.
#[derive(Debug, Clone)]
pub struct TreeArena {
    /// Arena storage for all tree nodes
    arena: Arena<TreeNode>,
    /// Index of the root node, None for empty trees
    root: Option<Index>,
}

impl Default for TreeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeArena {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    /// Inserts a node under `parent`, or as root when `parent` is None.
    #[instrument(level = "trace", skip(self, data), fields(id = %data.id))]
    pub fn insert_node(&mut self, data: NodeData, parent: Option<Index>) -> Index {
        let mut node = TreeNode::new(data);
        node.parent = parent;
        let node_idx = self.arena.insert(node);

        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.push(node_idx);
            }
        } else {
            self.root = Some(node_idx);
        }

        node_idx
    }

    /// Inserts a node that is neither root nor attached to a parent.
    pub fn insert_detached(&mut self, node: TreeNode) -> Index {
        self.arena.insert(node)
    }

    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    pub fn get_node_mut(&mut self, idx: Index) -> Option<&mut TreeNode> {
        self.arena.get_mut(idx)
    }

    pub fn contains(&self, idx: Index) -> bool {
        self.arena.contains(idx)
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    /// Number of nodes held by the arena, detached ones included.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Finds the attached node with the given id.
    pub fn find(&self, id: &str) -> Option<Index> {
        self.iter()
            .find(|(_, node)| node.data.id == id)
            .map(|(idx, _)| idx)
    }

    /// Position of `child` within the children of `parent`.
    pub fn child_position(&self, parent: Index, child: Index) -> Option<usize> {
        self.get_node(parent)?
            .children
            .iter()
            .position(|&c| c == child)
    }

    /// Indices of the subtree rooted at `idx`, pre-order.
    pub fn subtree(&self, idx: Index) -> Vec<Index> {
        let mut result = Vec::new();
        let mut stack = vec![idx];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.get_node(current) {
                result.push(current);
                for &child in node.children.iter().rev() {
                    stack.push(child);
                }
            }
        }
        result
    }

    /// Removes a single node from the arena without touching its relatives.
    pub(crate) fn remove(&mut self, idx: Index) -> Option<TreeNode> {
        self.arena.remove(idx)
    }

    /// Moves every node out of the arena, with its former index.
    pub(crate) fn drain(&mut self) -> Vec<(Index, TreeNode)> {
        self.root = None;
        self.arena.drain().collect()
    }

    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        if let Some(root) = self.root {
            self.calculate_depth(root)
        } else {
            0
        }
    }

    fn calculate_depth(&self, node_idx: Index) -> usize {
        if let Some(node) = self.get_node(node_idx) {
            1 + node
                .children
                .iter()
                .map(|&child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Collects the ids of all leaf nodes (nodes with no children), left to right.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_nodes(&self) -> Vec<String> {
        self.iter()
            .filter(|(_, node)| node.children.is_empty())
            .map(|(_, node)| node.data.id.clone())
            .collect()
    }

    /// Ids from the root down to `idx`, both included.
    pub fn path_to_root(&self, idx: Index) -> Vec<String> {
        let mut path = Vec::new();
        let mut current = Some(idx);
        while let Some(i) = current {
            match self.get_node(i) {
                Some(node) => {
                    path.push(node.data.id.clone());
                    current = node.parent;
                }
                None => break,
            }
        }
        path.reverse();
        path
    }
}

/// Pre-order iterator over the nodes attached to the root.
pub struct TreeIterator<'a> {
    arena: &'a TreeArena,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(arena: &'a TreeArena) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = arena.root() {
            stack.push(root);
        }
        Self { arena, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}
