//! Service container for dependency injection
//!
//! Wires settings and the filesystem into providers.

use std::path::Path;
use std::sync::Arc;

use url::Url;

use crate::application::Parameters;
use crate::config::Settings;
use crate::infrastructure::provider::{base_url_for, FileProvider};
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding settings and I/O dependencies.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            settings: Arc::new(settings),
            fs,
        }
    }

    /// Fresh provider; each provider tracks its own loaded documents.
    pub fn provider(&self) -> FileProvider {
        FileProvider::new(Arc::clone(&self.fs))
    }

    /// Base for resolving mount sources: the configured base directory, or
    /// the directory of `document`.
    pub fn base_for(&self, document: &Path) -> Option<Url> {
        match &self.settings.base_dir {
            Some(dir) => Url::from_directory_path(dir).ok(),
            None => self
                .fs
                .canonicalize(document)
                .ok()
                .and_then(|p| base_url_for(&p)),
        }
    }

    pub fn parameters(&self) -> Parameters {
        self.settings.parameters.clone()
    }
}
