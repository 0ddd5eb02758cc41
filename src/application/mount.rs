//! Mount driver: eager auto-mount at load time and lazy mounting on demand.

use generational_arena::Index;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::application::provider::{Parameters, Provider};
use crate::domain::{graft, prune, MountPoint, Tree};

/// Outcome of an [`auto_mount`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MountReport {
    /// Eager tasks grafted, nested ones included
    pub mounted: usize,
    /// Eager tasks the provider could not resolve
    pub failed: usize,
    /// Lazy tasks left for user-triggered mounting
    pub deferred: usize,
}

impl MountReport {
    fn absorb(&mut self, nested: MountReport) {
        self.mounted += nested.mounted;
        self.failed += nested.failed;
        self.deferred += nested.deferred;
    }
}

/// Resolves every eager mount task of `tree`, depth-first.
///
/// Drains the tree's task queue once. Each fetched subtree is auto-mounted
/// itself before it is grafted, so a subtree is grafted fully resolved or not
/// at all; nested counts are reported only for grafted subtrees. Failed tasks
/// are dropped and leave their placeholder in place. Tasks on nodes without a
/// parent are skipped before anything is fetched.
#[instrument(level = "debug", skip(tree, provider, parameters))]
pub fn auto_mount(
    tree: &mut Tree,
    provider: &mut dyn Provider,
    base: Option<&Url>,
    parameters: &Parameters,
) -> MountReport {
    let mut report = MountReport::default();

    for task in tree.take_mount_tasks() {
        if !task.now {
            report.deferred += 1;
            continue;
        }
        if !is_ungrafted_mount(tree, task.node) {
            debug!("skipping mount task that cannot be grafted: {}", task.url);
            continue;
        }

        let Some(mut subtree) = provider.make_tree(Some(&task.url), base, parameters, true) else {
            warn!("mount failed, keeping placeholder: {}", task.url);
            report.failed += 1;
            continue;
        };
        let nested = auto_mount(&mut subtree, provider, base, parameters);

        if attach(tree, task.node, subtree) {
            info!("mounted {}", task.url);
            report.mounted += 1;
            report.absorb(nested);
        } else {
            warn!("mounted tree rejected, keeping placeholder: {}", task.url);
            report.failed += 1;
        }
    }

    report
}

/// Mounts the placeholder `node` on demand, e.g. after the user expanded it.
///
/// Recursion is not checked: the user asked for this source explicitly.
/// Returns the grafted root.
#[instrument(level = "debug", skip(tree, provider, parameters))]
pub fn mount(
    tree: &mut Tree,
    node: Index,
    provider: &mut dyn Provider,
    base: Option<&Url>,
    parameters: &Parameters,
) -> Option<Index> {
    if !is_ungrafted_mount(tree, node) {
        debug!("mount ignored: not an attached, ungrafted mount point");
        return None;
    }
    let url = match tree.mount_point(node) {
        Some(MountPoint::Mounting { url, .. }) => url.clone(),
        _ => return None,
    };
    let subtree = provider.make_tree(Some(&url), base, parameters, false)?;
    let root = attach_root(tree, node, subtree)?;
    info!("mounted {}", url);
    Some(root)
}

/// Reverses a graft, returning the restored placeholder.
pub fn unmount(tree: &mut Tree, mounted: Index) -> Option<Index> {
    prune(tree, mounted)
}

/// Ungrafted Mounting point with a parent, i.e. one `graft` can accept.
fn is_ungrafted_mount(tree: &Tree, node: Index) -> bool {
    tree.node(node).is_some_and(|n| {
        n.parent.is_some() && matches!(n.mount, Some(MountPoint::Mounting { mounted: None, .. }))
    })
}

fn attach(tree: &mut Tree, node: Index, subtree: Tree) -> bool {
    attach_root(tree, node, subtree).is_some()
}

/// Moves `subtree` into `tree` and grafts it at `node`. On rejection the
/// adopted nodes are released again, leaving `tree` as it was.
fn attach_root(tree: &mut Tree, node: Index, subtree: Tree) -> Option<Index> {
    let adopted = tree.adopt(subtree)?;
    let root = adopted.root;
    if graft(tree, node, root, adopted.edges) {
        Some(root)
    } else {
        tree.release(root);
        None
    }
}
