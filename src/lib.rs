//! Mountable trees.
//!
//! Derives a single tree from a possibly cyclic directed graph and extends it
//! at runtime by grafting provider-resolved subtrees at mount points, with
//! prune as the exact reverse.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod tree_traits;
pub mod util;
