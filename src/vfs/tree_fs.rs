//! This module provides [`TreeFS`], an in-memory virtual file system with a
//! current working directory, built on [`NodeStore`].

use crate::core::{FsBackend, Result};
use crate::path::{MAX_PATH_LEN, PathResolver, VfsPath};

use super::entry::Metadata;
use super::store::NodeStore;

/// Tunables of a [`TreeFS`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FsConfig {
    /// Upper bound for the length of any canonical path.
    pub max_path_len: usize,
}

impl Default for FsConfig {
    fn default() -> Self {
        Self {
            max_path_len: MAX_PATH_LEN,
        }
    }
}

/// An in-memory virtual file system with POSIX-like paths.
///
/// All data lives in‑process; nothing touches the host filesystem.
///
/// ### Internal state
///
/// * `cwd` — Current Working Directory, a canonical absolute path. Relative
///   arguments are resolved against it. Defaults to `/`, changed by `cd()`.
///   It is a path, not a handle: if the directory is removed or moved away,
///   relative operations fail until the next `cd()`.
/// * `store` — the [`NodeStore`] owning every file and directory.
///
/// ### Thread Safety
///
/// Not thread‑safe. Wrap it in a `Mutex` at the application level if needed.
///
/// ### Example
///
/// ```
/// use vfs_tree::{FsBackend, TreeFS};
///
/// let mut fs = TreeFS::new();
/// fs.mkdir("/docs", false).unwrap();
/// fs.cd("docs").unwrap();
/// fs.write("note.txt", b"Hello", true).unwrap();
///
/// assert_eq!(fs.read("/docs/note.txt").unwrap(), b"Hello");
/// assert_eq!(fs.ls(Some("/docs")).unwrap(), vec!["note.txt"]);
/// ```
#[derive(Debug, Clone)]
pub struct TreeFS {
    cwd: VfsPath,
    store: NodeStore,
    config: FsConfig,
}

impl Default for TreeFS {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeFS {
    /// Creates an empty file system with the default configuration.
    pub fn new() -> Self {
        Self::with_config(FsConfig::default())
    }

    pub fn with_config(config: FsConfig) -> Self {
        Self {
            cwd: VfsPath::root(),
            store: NodeStore::with_resolver(PathResolver::new(config.max_path_len)),
            config,
        }
    }

    pub fn config(&self) -> &FsConfig {
        &self.config
    }

    /// Changes the path length limit for subsequent operations. Existing
    /// entries are kept even if they exceed the new limit.
    pub fn set_max_path_len(&mut self, max_path_len: usize) {
        self.config.max_path_len = max_path_len;
        self.store.set_resolver(PathResolver::new(max_path_len));
    }

    /// Read access to the underlying store.
    pub fn store(&self) -> &NodeStore {
        &self.store
    }

    /// Resolves `path` against the current working directory.
    pub fn resolve(&self, path: &str) -> Result<VfsPath> {
        self.store.resolver().resolve_str(&self.cwd, path)
    }

    fn resolve_or_cwd(&self, path: Option<&str>) -> Result<VfsPath> {
        match path {
            Some(path) => self.resolve(path),
            None => Ok(self.cwd.clone()),
        }
    }

    fn to_strings(paths: Vec<VfsPath>) -> Vec<String> {
        paths.into_iter().map(|p| p.to_string()).collect()
    }
}

impl FsBackend for TreeFS {
    /// Returns the current working directory.
    fn cwd(&self) -> &str {
        self.cwd.as_str()
    }

    /// Changes the current working directory.
    /// * `path` can be relative or absolute; it must name an existing directory.
    fn cd(&mut self, path: &str) -> Result<()> {
        let target = self.resolve(path)?;
        self.store.must_be_dir(&target)?;
        self.cwd = target;
        Ok(())
    }

    /// Checks if a `path` exists. Malformed paths do not exist.
    fn exists(&self, path: &str) -> bool {
        self.resolve(path)
            .map(|p| self.store.exists(&p))
            .unwrap_or(false)
    }

    fn is_dir(&self, path: &str) -> Result<bool> {
        let path = self.resolve(path)?;
        let id = self.store.must_exist(&path)?;
        Ok(self.store.entry(id).is_some_and(|e| e.is_dir()))
    }

    fn is_file(&self, path: &str) -> Result<bool> {
        let path = self.resolve(path)?;
        let id = self.store.must_exist(&path)?;
        Ok(self.store.entry(id).is_some_and(|e| e.is_file()))
    }

    fn metadata(&self, path: &str) -> Result<Metadata> {
        let path = self.resolve(path)?;
        self.store.metadata(&path)
    }

    /// Names of the immediate children of `path` (the cwd when `None`), in
    /// insertion order.
    fn ls(&self, path: Option<&str>) -> Result<Vec<String>> {
        let path = self.resolve_or_cwd(path)?;
        self.store.ls(&path)
    }

    /// Canonical paths of all descendants of `path` (the cwd when `None`),
    /// pre-order.
    fn tree(&self, path: Option<&str>) -> Result<Vec<String>> {
        let path = self.resolve_or_cwd(path)?;
        Ok(Self::to_strings(self.store.tree(&path)?))
    }

    /// Canonical paths of entries named exactly `name` inside `path` (the
    /// cwd when `None`); with `recursive`, anywhere below it.
    fn find(&self, name: &str, path: Option<&str>, recursive: bool) -> Result<Vec<String>> {
        let path = self.resolve_or_cwd(path)?;
        Ok(Self::to_strings(self.store.find(name, &path, recursive)?))
    }

    fn mkdir(&mut self, path: &str, recursive: bool) -> Result<()> {
        let path = self.resolve(path)?;
        self.store.mkdir(&path, recursive)?;
        Ok(())
    }

    fn mkfile(&mut self, path: &str, recursive: bool) -> Result<()> {
        let path = self.resolve(path)?;
        self.store.mkfile(&path, recursive)?;
        Ok(())
    }

    /// Reads the entire contents of a file.
    fn read(&self, path: &str) -> Result<Vec<u8>> {
        let path = self.resolve(path)?;
        Ok(self.store.read(&path)?.to_vec())
    }

    /// Replaces the contents of a file. With `force`, a missing file is
    /// created together with its missing parents.
    fn write(&mut self, path: &str, content: &[u8], force: bool) -> Result<()> {
        let path = self.resolve(path)?;
        self.store.write(&path, content, force)
    }

    /// Appends bytes to an existing file.
    fn append(&mut self, path: &str, content: &[u8]) -> Result<()> {
        let path = self.resolve(path)?;
        self.store.append(&path, content)
    }

    fn rm(&mut self, path: &str, recursive: bool) -> Result<()> {
        let path = self.resolve(path)?;
        self.store.rm(&path, recursive)
    }

    fn mv(&mut self, from: &str, to: &str, force: bool) -> Result<()> {
        let from = self.resolve(from)?;
        let to = self.resolve(to)?;
        self.store.mv(&from, &to, force)
    }

    fn merge_dir(&mut self, from: &str, to: &str) -> Result<()> {
        let from = self.resolve(from)?;
        let to = self.resolve(to)?;
        self.store.merge_dir(&from, &to)
    }

    /// Removes all artifacts (dirs and files), but preserves the root.
    /// The cwd is reset to `/`.
    fn cleanup(&mut self) -> Result<()> {
        self.store.clear()?;
        self.cwd = VfsPath::root();
        log::debug!("cleanup: cwd reset to /");
        Ok(())
    }
}
