//! Provider boundary: resolving a source into a tree
//!
//! Providers perform all fetching and parsing. They never fail loudly: an
//! unresolvable source yields `None` and a warning on the listener.

use std::collections::BTreeMap;

use tracing::{info, warn};
use url::Url;

use crate::domain::Tree;

/// Free-form parameters handed to a provider.
pub type Parameters = BTreeMap<String, String>;

/// A tree together with the display settings read alongside it.
#[derive(Debug, Clone, Default)]
pub struct Model {
    pub tree: Tree,
    pub settings: BTreeMap<String, String>,
}

/// Side channel for provider diagnostics.
pub trait ProgressListener {
    fn progress(&self, message: &str);
    fn warn(&self, message: &str);
}

/// Forwards diagnostics to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingListener;

impl ProgressListener for TracingListener {
    fn progress(&self, message: &str) {
        info!("{}", message);
    }

    fn warn(&self, message: &str) {
        warn!("{}", message);
    }
}

/// Resolves sources (mount URLs, links, the initial document) into trees.
pub trait Provider {
    /// Builds the tree described by `source`, resolved against `base`.
    ///
    /// With `check_recursion`, a source already loaded by this provider is
    /// rejected so that a document mounting itself cannot loop.
    fn make_tree(
        &mut self,
        source: Option<&str>,
        base: Option<&Url>,
        parameters: &Parameters,
        check_recursion: bool,
    ) -> Option<Tree>;

    /// Builds tree and settings. Providers without settings get an empty map.
    fn make_model(
        &mut self,
        source: Option<&str>,
        base: Option<&Url>,
        parameters: &Parameters,
    ) -> Option<Model> {
        self.make_tree(source, base, parameters, false)
            .map(|tree| Model {
                tree,
                settings: BTreeMap::new(),
            })
    }
}
