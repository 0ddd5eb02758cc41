//! Graft and prune: the two legal mount point transitions.
//!
//! Both operations check every precondition before touching the tree. A
//! rejected call returns `false`/`None` and leaves the tree unchanged.

use std::collections::HashSet;

use generational_arena::Index;
use tracing::{debug, instrument, warn};

use crate::domain::entities::{Edge, EdgeId, MountPoint};
use crate::domain::tree::Tree;

/// Replaces the placeholder `mounting` by the detached subtree root
/// `mounted_root` and appends `imported_edges` to the tree's edges.
///
/// Requires that `mounting` has a parent and a Mounting mount point that is
/// not grafted yet, and that `mounted_root` is detached, carries no mount
/// point and is not an ancestor of `mounting`. Every imported edge must stay
/// within the subtree of `mounted_root`. The grafted root takes over the
/// placeholder's incoming edge decoration.
#[instrument(level = "debug", skip(tree, imported_edges))]
pub fn graft(tree: &mut Tree, mounting: Index, mounted_root: Index, imported_edges: Vec<Edge>) -> bool {
    if mounting == mounted_root {
        return false;
    }
    let Some(placeholder) = tree.node(mounting) else {
        warn!("graft: unknown mounting node");
        return false;
    };
    let Some(parent) = placeholder.parent else {
        debug!("graft rejected: mounting node has no parent");
        return false;
    };
    if !matches!(placeholder.mount, Some(MountPoint::Mounting { mounted: None, .. })) {
        debug!("graft rejected: node is not an ungrafted mount point");
        return false;
    }
    let decoration = placeholder.data.edge.clone();

    let Some(root) = tree.node(mounted_root) else {
        warn!("graft: unknown mounted root");
        return false;
    };
    if root.mount.is_some() || root.parent.is_some() {
        debug!("graft rejected: mounted root already has a mount point or a parent");
        return false;
    }
    if is_ancestor(tree, mounted_root, parent) {
        debug!("graft rejected: mounted root is an ancestor of the mounting node");
        return false;
    }
    let Some(position) = tree.nodes().child_position(parent, mounting) else {
        warn!("graft: mounting node missing from its parent's children");
        return false;
    };
    let subtree: HashSet<Index> = tree.nodes().subtree(mounted_root).into_iter().collect();
    if let Some(edge) = imported_edges
        .iter()
        .find(|e| !subtree.contains(&e.from) || !subtree.contains(&e.to))
    {
        debug!("graft rejected: imported edge {} leaves the mounted subtree", edge.id);
        return false;
    }

    let edge_ids: Vec<EdgeId> = imported_edges.iter().map(|e| e.id).collect();
    let nodes = tree.nodes_mut();
    if let Some(parent_node) = nodes.get_node_mut(parent) {
        parent_node.children[position] = mounted_root;
    }
    if let Some(root) = nodes.get_node_mut(mounted_root) {
        root.parent = Some(parent);
        root.data.edge = decoration;
        root.mount = Some(MountPoint::Mounted {
            mounting,
            edges: edge_ids,
        });
    }
    if let Some(placeholder) = nodes.get_node_mut(mounting) {
        placeholder.parent = None;
        if let Some(MountPoint::Mounting { mounted, .. }) = placeholder.mount.as_mut() {
            *mounted = Some(mounted_root);
        }
    }
    let imported = imported_edges.len();
    tree.push_edges(imported_edges);

    debug!("grafted subtree at position {} with {} edges", position, imported);
    true
}

/// Reverses [`graft`]: puts the placeholder back in place of `mounted` and
/// removes the edges imported with the subtree, including those imported by
/// grafts nested inside it. The pruned subtree is released from the arena.
///
/// Returns the restored placeholder, or None when `mounted` is not a grafted
/// root or its cross-reference with the placeholder is not symmetric.
#[instrument(level = "debug", skip(tree))]
pub fn prune(tree: &mut Tree, mounted: Index) -> Option<Index> {
    let node = tree.node(mounted)?;
    let Some(parent) = node.parent else {
        debug!("prune rejected: node has no parent");
        return None;
    };
    let mounting = match &node.mount {
        Some(MountPoint::Mounted { mounting, .. }) => *mounting,
        _ => {
            debug!("prune rejected: node is not mounted");
            return None;
        }
    };
    match tree.mount_point(mounting) {
        Some(MountPoint::Mounting {
            mounted: Some(back),
            ..
        }) if *back == mounted => {}
        _ => {
            warn!("prune rejected: asymmetric mount cross-reference");
            return None;
        }
    }
    let position = tree.nodes().child_position(parent, mounted)?;

    let edge_ids = imported_edges(tree, mounted);

    let nodes = tree.nodes_mut();
    if let Some(parent_node) = nodes.get_node_mut(parent) {
        parent_node.children[position] = mounting;
    }
    if let Some(placeholder) = nodes.get_node_mut(mounting) {
        placeholder.parent = Some(parent);
        if let Some(MountPoint::Mounting { mounted, .. }) = placeholder.mount.as_mut() {
            *mounted = None;
        }
    }
    if let Some(root) = nodes.get_node_mut(mounted) {
        root.parent = None;
        root.mount = None;
    }

    let removed = tree.remove_edges(&edge_ids);
    let released = tree.release(mounted);
    debug!(
        "pruned subtree: {} edges removed, {} nodes released",
        removed, released
    );
    Some(mounting)
}

/// Whether `candidate` is `node` or lies on its parent chain.
fn is_ancestor(tree: &Tree, candidate: Index, node: Index) -> bool {
    let mut current = Some(node);
    while let Some(idx) = current {
        if idx == candidate {
            return true;
        }
        current = tree.node(idx).and_then(|n| n.parent);
    }
    false
}

/// Edges imported by the graft at `mounted` and by every graft below it,
/// collected depth-first.
fn imported_edges(tree: &Tree, mounted: Index) -> Vec<EdgeId> {
    tree.nodes()
        .subtree(mounted)
        .into_iter()
        .filter_map(|idx| match tree.mount_point(idx) {
            Some(MountPoint::Mounted { edges, .. }) => Some(edges.clone()),
            _ => None,
        })
        .flatten()
        .collect()
}
