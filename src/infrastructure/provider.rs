//! Provider over local TOML graph documents

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, instrument};
use url::Url;

use crate::application::{
    ApplicationError, ApplicationResult, IoResultExt, Model, Parameters, ProgressListener,
    Provider, TracingListener,
};
use crate::domain::Tree;
use crate::infrastructure::document::GraphDocument;
use crate::infrastructure::traits::FileSystem;

/// Expand environment variables in a source string.
///
/// Supports `$VAR`, `${VAR}` and `~`. Unknown variables leave the input untouched.
pub fn expand_env_vars(source: &str) -> String {
    shellexpand::full(source)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| source.to_string())
}

/// Directory URL of `path`, usable as base for sources relative to it.
pub fn base_url_for(path: &Path) -> Option<Url> {
    let dir = if path.is_dir() { path } else { path.parent()? };
    Url::from_directory_path(dir).ok()
}

/// Loads graph documents from the filesystem.
///
/// Remembers every document it loaded; with `check_recursion` a document that
/// was already loaded is refused.
pub struct FileProvider {
    fs: Arc<dyn FileSystem>,
    listener: Box<dyn ProgressListener>,
    loaded: HashSet<PathBuf>,
}

impl FileProvider {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self {
            fs,
            listener: Box::new(TracingListener),
            loaded: HashSet::new(),
        }
    }

    pub fn with_listener(mut self, listener: Box<dyn ProgressListener>) -> Self {
        self.listener = listener;
        self
    }

    /// Documents loaded so far, canonicalized.
    pub fn loaded(&self) -> &HashSet<PathBuf> {
        &self.loaded
    }

    /// Resolves `source` like a link: absolute URL, absolute path, or a path
    /// relative to `base` (the working directory without base).
    pub fn resolve(&self, source: &str, base: Option<&Url>) -> ApplicationResult<PathBuf> {
        let expanded = expand_env_vars(source.trim());
        if expanded.is_empty() {
            return Err(ApplicationError::Unresolvable(source.to_string()));
        }

        let url = match Url::parse(&expanded) {
            // Single letter schemes are drive letters
            Ok(url) if url.scheme().len() > 1 => url,
            _ => {
                let path = PathBuf::from(&expanded);
                if path.is_absolute() {
                    Url::from_file_path(&path)
                        .map_err(|_| ApplicationError::Unresolvable(expanded.clone()))?
                } else if let Some(base) = base {
                    base.join(&expanded)
                        .map_err(|_| ApplicationError::Unresolvable(expanded.clone()))?
                } else {
                    let cwd = self
                        .fs
                        .current_dir()
                        .with_path_context("read working directory for", &path)?;
                    return Ok(cwd.join(path));
                }
            }
        };

        if url.scheme() != "file" {
            return Err(ApplicationError::Unresolvable(format!(
                "unsupported scheme '{}': {}",
                url.scheme(),
                url
            )));
        }
        url.to_file_path()
            .map_err(|_| ApplicationError::Unresolvable(url.to_string()))
    }

    /// Resolves, reads and parses a document, registering it as loaded.
    #[instrument(level = "debug", skip(self))]
    pub fn load(
        &mut self,
        source: &str,
        base: Option<&Url>,
        check_recursion: bool,
    ) -> ApplicationResult<Option<(PathBuf, GraphDocument)>> {
        let path = self.resolve(source, base)?;
        if !self.fs.is_file(&path) {
            return Err(ApplicationError::Unresolvable(path.display().to_string()));
        }
        let path = self.fs.canonicalize(&path).with_path_context("canonicalize", &path)?;

        if check_recursion && self.loaded.contains(&path) {
            self.listener
                .warn(&format!("recursion detected, not loading {}", path.display()));
            return Ok(None);
        }
        self.loaded.insert(path.clone());

        self.listener.progress(&format!("loading {}", path.display()));
        let content = self.fs.read_to_string(&path).with_path_context("read", &path)?;
        let document =
            GraphDocument::parse(&content).map_err(|e| ApplicationError::InvalidDocument {
                path: path.clone(),
                message: e.to_string(),
            })?;
        debug!("parsed {} nodes from {}", document.nodes.len(), path.display());
        Ok(Some((path, document)))
    }

    fn load_model(
        &mut self,
        source: Option<&str>,
        base: Option<&Url>,
        check_recursion: bool,
    ) -> Option<Model> {
        let Some(source) = source else {
            self.listener.warn("no source given");
            return None;
        };
        let loaded = self
            .load(source, base, check_recursion)
            .and_then(|loaded| match loaded {
                Some((_, document)) => document.to_tree().map(|tree| Some((tree, document))),
                None => Ok(None),
            });
        match loaded {
            Ok(Some((tree, document))) => Some(Model {
                tree,
                settings: document.settings,
            }),
            Ok(None) => None,
            Err(e) => {
                self.listener.warn(&format!("{}: {}", source, e));
                None
            }
        }
    }
}

impl Provider for FileProvider {
    fn make_tree(
        &mut self,
        source: Option<&str>,
        base: Option<&Url>,
        _parameters: &Parameters,
        check_recursion: bool,
    ) -> Option<Tree> {
        self.load_model(source, base, check_recursion)
            .map(|model| model.tree)
    }

    fn make_model(
        &mut self,
        source: Option<&str>,
        base: Option<&Url>,
        _parameters: &Parameters,
    ) -> Option<Model> {
        self.load_model(source, base, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::traits::RealFileSystem;

    #[test]
    fn given_relative_source_and_base_when_resolving_then_joins_base() {
        let provider = FileProvider::new(Arc::new(RealFileSystem));
        let base = Url::parse("file:///data/trees/").unwrap();
        let path = provider.resolve("sub/more.toml", Some(&base)).unwrap();
        assert_eq!(path, PathBuf::from("/data/trees/sub/more.toml"));
    }

    #[test]
    fn given_file_url_when_resolving_then_ignores_base() {
        let provider = FileProvider::new(Arc::new(RealFileSystem));
        let base = Url::parse("file:///data/trees/").unwrap();
        let path = provider
            .resolve("file:///other/place.toml", Some(&base))
            .unwrap();
        assert_eq!(path, PathBuf::from("/other/place.toml"));
    }

    #[test]
    fn given_http_url_when_resolving_then_rejects_scheme() {
        let provider = FileProvider::new(Arc::new(RealFileSystem));
        let result = provider.resolve("https://example.com/tree.toml", None);
        assert!(matches!(result, Err(ApplicationError::Unresolvable(_))));
    }

    #[test]
    fn given_empty_source_when_resolving_then_fails() {
        let provider = FileProvider::new(Arc::new(RealFileSystem));
        assert!(provider.resolve("  ", None).is_err());
    }
}
