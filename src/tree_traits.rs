//! termtree rendering of mounted trees

use generational_arena::Index;
use termtree::Tree as TermTree;

use crate::domain::{MountPoint, Tree, TreeNode};

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> TermTree<String>;
}

/// One-line description of a node: name, incoming edge label, mount state.
pub fn node_line(node: &TreeNode) -> String {
    let mut line = node.data.display_name().to_string();
    if let Some(label) = &node.data.edge.label {
        line = format!("({}) {}", label, line);
    }
    match &node.mount {
        Some(MountPoint::Mounting { url, now, .. }) => {
            let mode = if *now { "now" } else { "lazy" };
            line.push_str(&format!(" [mount {}: {}]", mode, url));
        }
        Some(MountPoint::Mounted { .. }) => line.push_str(" [mounted]"),
        None => {}
    }
    line
}

impl TreeNodeConvert for Tree {
    fn to_tree_string(&self) -> TermTree<String> {
        fn build_tree(tree: &Tree, node_idx: Index, parent_tree: &mut TermTree<String>) {
            if let Some(node) = tree.node(node_idx) {
                for &child_idx in &node.children {
                    if let Some(child) = tree.node(child_idx) {
                        let mut child_tree = TermTree::new(node_line(child));
                        build_tree(tree, child_idx, &mut child_tree);
                        parent_tree.push(child_tree);
                    }
                }
            }
        }

        match self.root().and_then(|idx| Some((idx, self.node(idx)?))) {
            Some((root_idx, root)) => {
                let mut tree = TermTree::new(node_line(root));
                build_tree(self, root_idx, &mut tree);
                tree
            }
            None => TermTree::new("Empty tree".to_string()),
        }
    }
}
