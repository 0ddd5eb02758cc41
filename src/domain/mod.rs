//! Domain layer: tree model, graph conversion and the mount protocol
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod converter;
pub mod entities;
pub mod error;
pub mod graph;
pub mod mounter;
pub mod tree;

pub use arena::{TreeArena, TreeNode};
pub use converter::{graph_to_tree, select_root};
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use graph::{Graph, GraphEdge, GraphNode, GraphSource};
pub use mounter::{graft, prune};
pub use tree::{Adopted, MountQueue, Tree};

pub use generational_arena::Index;
