//! Filesystem seam of the file provider
//!
//! Tests swap in an in-memory implementation through
//! [`ServiceContainer::with_deps`](crate::infrastructure::ServiceContainer::with_deps).

use std::io;
use std::path::{Path, PathBuf};

/// The few filesystem operations needed to resolve and read documents.
pub trait FileSystem: Send + Sync {
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    fn is_file(&self, path: &Path) -> bool;

    /// Absolute form of `path`; also the key for recursion detection.
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;

    /// Anchor for relative sources when no base is given.
    fn current_dir(&self) -> io::Result<PathBuf>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        std::fs::canonicalize(path)
    }

    fn current_dir(&self) -> io::Result<PathBuf> {
        std::env::current_dir()
    }
}
