//! Tests for graft and prune

mod common;

use common::{children_of, edge_set, graph_with_mounts, outline};
use graftree::domain::{
    graft, graph_to_tree, prune, Adopted, Decoration, Index, LineStyle, MountPoint, NodeData,
    Tree,
};

/// root -> a (mount point), root -> z, non-tree edge z -> root
fn host() -> Tree {
    let g = graph_with_mounts(
        &[("root", None), ("a", Some(("sub.toml", true))), ("z", None)],
        &[("root", "a"), ("root", "z"), ("z", "root")],
    );
    graph_to_tree(g, None).unwrap()
}

/// b -> c with non-tree edge c -> b
fn fetched() -> Tree {
    let mut sub = Tree::new(NodeData::new("b"));
    let b = sub.root().unwrap();
    let c = sub.add_child(b, NodeData::new("c"));
    sub.add_edge(c, b, Decoration::default());
    sub
}

fn adopt(tree: &mut Tree, sub: Tree) -> Adopted {
    tree.adopt(sub).expect("non-empty subtree")
}

fn mounted_host() -> (Tree, Index, Index) {
    let mut tree = host();
    let a = tree.find("a").unwrap();
    let adopted = adopt(&mut tree, fetched());
    let root = adopted.root;
    assert!(graft(&mut tree, a, root, adopted.edges));
    (tree, a, root)
}

// ============================================================
// Graft
// ============================================================

#[test]
fn given_mount_point_when_grafting_then_subtree_replaces_placeholder() {
    let (tree, a, b) = mounted_host();

    assert_eq!(children_of(&tree, "root"), vec!["b", "z"]);
    assert_eq!(children_of(&tree, "b"), vec!["c"]);
    assert!(tree.find("a").is_none());

    let placeholder = tree.node(a).unwrap();
    assert!(placeholder.parent.is_none());
    assert_eq!(
        placeholder.mount,
        Some(MountPoint::Mounting {
            url: "sub.toml".into(),
            now: true,
            mounted: Some(b),
        })
    );
    match tree.mount_point(b) {
        Some(MountPoint::Mounted { mounting, edges }) => {
            assert_eq!(*mounting, a);
            assert_eq!(edges.len(), 1);
        }
        other => panic!("expected mounted root, got {:?}", other),
    }
    assert_eq!(tree.edges().len(), 2);
    assert!(edge_set(&tree).contains(&("c".to_string(), "b".to_string())));
}

#[test]
fn given_decorated_placeholder_when_grafting_then_root_inherits_decoration() {
    let mut tree = host();
    let a = tree.find("a").unwrap();
    let decoration = Decoration {
        label: Some("details".into()),
        color: Some("#336699".into()),
        style: Some(LineStyle::Dot),
        image: None,
    };
    tree.nodes_mut().get_node_mut(a).unwrap().data.edge = decoration.clone();

    let mut sub = fetched();
    let sub_root = sub.root().unwrap();
    sub.nodes_mut().get_node_mut(sub_root).unwrap().data.edge.label = Some("lost".into());
    let adopted = adopt(&mut tree, sub);

    assert!(graft(&mut tree, a, adopted.root, adopted.edges));
    assert_eq!(tree.node(adopted.root).unwrap().data.edge, decoration);
}

#[test]
fn given_root_node_when_grafting_then_rejects() {
    let g = graph_with_mounts(&[("root", Some(("x.toml", true)))], &[]);
    let mut tree = graph_to_tree(g, None).unwrap();
    let root = tree.root().unwrap();
    let adopted = adopt(&mut tree, fetched());

    assert!(!graft(&mut tree, root, adopted.root, adopted.edges));
    assert!(tree.mount_point(root).unwrap().is_mounting());
    assert!(tree.edges().is_empty());
}

#[test]
fn given_node_without_mount_point_when_grafting_then_rejects() {
    let mut tree = host();
    let z = tree.find("z").unwrap();
    let before = outline(&tree);
    let adopted = adopt(&mut tree, fetched());

    assert!(!graft(&mut tree, z, adopted.root, adopted.edges));
    assert_eq!(outline(&tree), before);
    assert_eq!(tree.edges().len(), 1);
}

#[test]
fn given_already_grafted_placeholder_when_grafting_again_then_rejects() {
    let (mut tree, a, _) = mounted_host();
    let before = outline(&tree);
    let edges_before = tree.edges().to_vec();
    let adopted = adopt(&mut tree, fetched());

    assert!(!graft(&mut tree, a, adopted.root, adopted.edges));
    assert_eq!(outline(&tree), before);
    assert_eq!(tree.edges(), edges_before.as_slice());
}

#[test]
fn given_subtree_root_with_mount_point_when_grafting_then_rejects() {
    let mut tree = host();
    let a = tree.find("a").unwrap();
    let mut sub = fetched();
    let sub_root = sub.root().unwrap();
    sub.declare_mount(sub_root, "deeper.toml", false);
    let adopted = adopt(&mut tree, sub);

    assert!(!graft(&mut tree, a, adopted.root, adopted.edges));
    assert_eq!(children_of(&tree, "root"), vec!["a", "z"]);
    assert!(tree.mount_point(a).unwrap().is_mounting());
}

#[test]
fn given_attached_subtree_root_when_grafting_then_rejects() {
    let mut tree = host();
    let a = tree.find("a").unwrap();
    let z = tree.find("z").unwrap();

    assert!(!graft(&mut tree, a, z, Vec::new()));
    assert_eq!(children_of(&tree, "root"), vec!["a", "z"]);
}

#[test]
fn given_host_root_as_subtree_root_when_grafting_then_rejects() {
    let mut tree = host();
    let a = tree.find("a").unwrap();
    let root = tree.root().unwrap();
    let before = outline(&tree);

    assert!(!graft(&mut tree, a, root, Vec::new()));
    assert_eq!(outline(&tree), before);
    assert!(tree.node(root).unwrap().parent.is_none());
    assert_eq!(tree.nodes().iter().count(), 3);
}

#[test]
fn given_detached_ancestor_of_placeholder_when_grafting_then_rejects() {
    let mut tree = host();
    let mut sub = fetched();
    let c = sub.find("c").unwrap();
    sub.declare_mount(c, "inner.toml", true);
    let adopted = adopt(&mut tree, sub);
    let c = tree.node(adopted.root).unwrap().children[0];

    // the placeholder c sits below the detached root b it would receive
    assert!(!graft(&mut tree, c, adopted.root, Vec::new()));
    assert_eq!(tree.node(c).unwrap().parent, Some(adopted.root));
    assert!(tree.node(adopted.root).unwrap().parent.is_none());
}

#[test]
fn given_imported_edge_touching_host_when_grafting_then_rejects() {
    let mut tree = host();
    let a = tree.find("a").unwrap();
    let z = tree.find("z").unwrap();
    let adopted = adopt(&mut tree, fetched());
    let mut edges = adopted.edges.clone();
    edges[0].to = z;
    let edges_before = tree.edges().to_vec();

    assert!(!graft(&mut tree, a, adopted.root, edges));
    assert_eq!(children_of(&tree, "root"), vec!["a", "z"]);
    assert_eq!(tree.edges(), edges_before.as_slice());
    assert!(tree.mount_point(a).unwrap().is_mounting());

    assert!(graft(&mut tree, a, adopted.root, adopted.edges));
}

// ============================================================
// Prune
// ============================================================

#[test]
fn given_grafted_subtree_when_pruning_then_original_tree_is_restored() {
    let mut tree = host();
    let a = tree.find("a").unwrap();
    let outline_before = outline(&tree);
    let edges_before = tree.edges().to_vec();
    let arena_before = tree.nodes().len();

    let adopted = adopt(&mut tree, fetched());
    let b = adopted.root;
    assert!(graft(&mut tree, a, b, adopted.edges));
    let restored = prune(&mut tree, b);

    assert_eq!(restored, Some(a));
    assert_eq!(outline(&tree), outline_before);
    assert_eq!(tree.edges(), edges_before.as_slice());
    assert_eq!(tree.nodes().len(), arena_before);
    assert_eq!(
        tree.mount_point(a),
        Some(&MountPoint::Mounting {
            url: "sub.toml".into(),
            now: true,
            mounted: None,
        })
    );
    assert!(!tree.nodes().contains(b));
}

#[test]
fn given_pruned_mount_point_when_grafting_again_then_succeeds() {
    let (mut tree, a, b) = mounted_host();
    prune(&mut tree, b).unwrap();

    let adopted = adopt(&mut tree, fetched());
    assert!(graft(&mut tree, a, adopted.root, adopted.edges));
    assert_eq!(children_of(&tree, "root"), vec!["b", "z"]);
}

#[test]
fn given_node_that_is_not_mounted_when_pruning_then_rejects() {
    let mut tree = host();
    let a = tree.find("a").unwrap();
    let z = tree.find("z").unwrap();

    assert_eq!(prune(&mut tree, a), None);
    assert_eq!(prune(&mut tree, z), None);
    assert_eq!(children_of(&tree, "root"), vec!["a", "z"]);
}

#[test]
fn given_root_when_pruning_then_rejects() {
    let mut tree = host();
    let root = tree.root().unwrap();
    assert_eq!(prune(&mut tree, root), None);
}

#[test]
fn given_asymmetric_cross_reference_when_pruning_then_rejects_without_mutation() {
    let (mut tree, a, b) = mounted_host();
    if let Some(MountPoint::Mounting { mounted, .. }) =
        tree.nodes_mut().get_node_mut(a).unwrap().mount.as_mut()
    {
        *mounted = None;
    }
    let before = outline(&tree);
    let edges_before = tree.edges().len();

    assert_eq!(prune(&mut tree, b), None);
    assert_eq!(outline(&tree), before);
    assert_eq!(tree.edges().len(), edges_before);
    assert!(tree.mount_point(b).unwrap().is_mounted());
}

#[test]
fn given_nested_grafts_when_pruning_outer_then_nested_edges_are_removed() {
    let (mut tree, _, b) = mounted_host();
    let c = tree.find("c").unwrap();
    tree.declare_mount(c, "inner.toml", true);

    // inner subtree: d -> e, non-tree edge e -> d
    let mut inner = Tree::new(NodeData::new("d"));
    let d = inner.root().unwrap();
    let e = inner.add_child(d, NodeData::new("e"));
    inner.add_edge(e, d, Decoration::default());
    let adopted = adopt(&mut tree, inner);
    assert!(graft(&mut tree, c, adopted.root, adopted.edges));
    assert_eq!(tree.edges().len(), 3);
    assert_eq!(children_of(&tree, "b"), vec!["d"]);

    prune(&mut tree, b).unwrap();

    assert_eq!(edge_set(&tree).into_iter().collect::<Vec<_>>(), vec![(
        "z".to_string(),
        "root".to_string()
    )]);
    assert_eq!(children_of(&tree, "root"), vec!["a", "z"]);
    assert_eq!(tree.nodes().len(), 3);
}
