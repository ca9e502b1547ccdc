//! Arena of entries plus a canonical-path index.
//!
//! Entries are owned by the arena and addressed by [`NodeId`]. Parent/child
//! structure lives in the entries themselves (`parent` link, ordered
//! `children`); the path index is a lookup cache kept in step with it by
//! [`NodeStore::insert`], [`NodeStore::remove`] and [`NodeStore::relocate`].
//!
//! ### Invariants
//!
//! 1. The root `/` is always present, is a directory and is never removed.
//! 2. Every non-root entry has a parent, and that parent is a directory.
//! 3. A directory's `children` are exactly the entries whose `parent` is that
//!    directory, in insertion order.
//! 4. `index[path_of(id)] == id` for every entry, and the index holds nothing else.

use std::collections::HashMap;

use crate::core::Result;
use crate::error::VfsError;
use crate::path::{PathResolver, VfsPath};

use super::entry::{Entry, EntryType, Metadata, NodeId};

#[derive(Debug, Clone)]
pub struct NodeStore {
    entries: HashMap<NodeId, Entry>,
    index: HashMap<VfsPath, NodeId>,
    root: NodeId,
    next_id: u64,
    resolver: PathResolver,
}

impl Default for NodeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeStore {
    /// Creates a store holding only the root directory.
    pub fn new() -> Self {
        Self::with_resolver(PathResolver::default())
    }

    pub fn with_resolver(resolver: PathResolver) -> Self {
        let root = NodeId(0);
        let mut entries = HashMap::new();
        entries.insert(root, Entry::directory("", None));
        let mut index = HashMap::new();
        index.insert(VfsPath::root(), root);

        Self {
            entries,
            index,
            root,
            next_id: 1,
            resolver,
        }
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    pub(crate) fn set_resolver(&mut self, resolver: PathResolver) {
        self.resolver = resolver;
    }

    pub fn root_id(&self) -> NodeId {
        self.root
    }

    /// Number of entries, root included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 1
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn entry(&self, id: NodeId) -> Option<&Entry> {
        self.entries.get(&id)
    }

    pub(crate) fn entry_mut(&mut self, id: NodeId) -> Option<&mut Entry> {
        self.entries.get_mut(&id)
    }

    pub fn lookup(&self, path: &VfsPath) -> Option<NodeId> {
        self.index.get(path).copied()
    }

    pub fn get(&self, path: &VfsPath) -> Option<&Entry> {
        self.lookup(path).and_then(|id| self.entry(id))
    }

    pub fn exists(&self, path: &VfsPath) -> bool {
        self.index.contains_key(path)
    }

    /// Store operations only take resolved absolute paths.
    pub(crate) fn must_be_canonical(&self, path: &VfsPath) -> Result<()> {
        if !path.is_canonical() {
            return Err(VfsError::invalid_path(
                path.as_str(),
                "expected an absolute path without `.` or `..`",
            ));
        }
        Ok(())
    }

    pub fn must_exist(&self, path: &VfsPath) -> Result<NodeId> {
        self.must_be_canonical(path)?;
        self.lookup(path)
            .ok_or_else(|| VfsError::PathDoesNotExist(path.clone()))
    }

    pub fn must_not_exist(&self, path: &VfsPath) -> Result<()> {
        self.must_be_canonical(path)?;
        if self.exists(path) {
            return Err(VfsError::PathAlreadyExists(path.clone()));
        }
        Ok(())
    }

    pub fn must_be_file(&self, path: &VfsPath) -> Result<NodeId> {
        let id = self.must_exist(path)?;
        if !self.is_file_id(id) {
            return Err(VfsError::PathNotFile(path.clone()));
        }
        Ok(id)
    }

    pub fn must_be_dir(&self, path: &VfsPath) -> Result<NodeId> {
        let id = self.must_exist(path)?;
        if !self.is_dir_id(id) {
            return Err(VfsError::PathNotDirectory(path.clone()));
        }
        Ok(id)
    }

    pub(crate) fn is_dir_id(&self, id: NodeId) -> bool {
        self.entry(id).is_some_and(Entry::is_dir)
    }

    pub(crate) fn is_file_id(&self, id: NodeId) -> bool {
        self.entry(id).is_some_and(Entry::is_file)
    }

    /// Entry for an id that came out of this store.
    pub(crate) fn existing(&self, id: NodeId) -> Result<&Entry> {
        match self.entry(id) {
            Some(entry) => Ok(entry),
            None => Err(VfsError::PathDoesNotExist(self.detached_path(id))),
        }
    }

    fn detached_path(&self, id: NodeId) -> VfsPath {
        VfsPath::from_names(vec![format!("#{}", id.0)])
    }

    /// Canonical path of `id`, derived from parent links.
    pub fn path_of(&self, id: NodeId) -> Result<VfsPath> {
        let mut names = Vec::new();
        let mut current = self.existing(id)?;
        while let Some(parent) = current.parent() {
            names.push(current.name().to_string());
            current = self.existing(parent)?;
        }
        names.reverse();
        Ok(VfsPath::from_names(names))
    }

    /// Names of the immediate children of `id`, in insertion order.
    pub fn child_names(&self, id: NodeId) -> Result<Vec<String>> {
        let entry = self.existing(id)?;
        entry
            .children()
            .iter()
            .map(|child| self.existing(*child).map(|e| e.name().to_string()))
            .collect()
    }

    pub(crate) fn child_named(&self, dir: NodeId, name: &str) -> Option<NodeId> {
        self.entry(dir)?
            .children()
            .iter()
            .copied()
            .find(|child| self.entry(*child).is_some_and(|e| e.name() == name))
    }

    /// Adds a new, empty entry at `path`. The path must be free and its parent
    /// must be an existing directory; the arena, the index and the parent's
    /// child list are updated together.
    pub fn insert(&mut self, path: &VfsPath, entry_type: EntryType) -> Result<NodeId> {
        self.must_not_exist(path)?;
        let parent = self.must_be_dir(&path.parent())?;

        let id = NodeId(self.next_id);
        self.next_id += 1;
        let entry = match entry_type {
            EntryType::Directory => Entry::directory(path.name(), Some(parent)),
            EntryType::File => Entry::file(path.name(), parent),
        };

        self.entries.insert(id, entry);
        self.index.insert(path.clone(), id);
        if let Some(parent) = self.entry_mut(parent) {
            parent.add_child(id);
        }
        log::trace!("index: + {path}");
        Ok(id)
    }

    /// Removes the single entry at `path`. Directories must be empty; see
    /// [`NodeStore::remove_subtree`] for the recursive variant.
    pub fn remove(&mut self, path: &VfsPath) -> Result<()> {
        let id = self.must_exist(path)?;
        if id == self.root {
            return Err(VfsError::ActionNotAllowed(path.clone()));
        }
        if !self.existing(id)?.children().is_empty() {
            return Err(VfsError::DirectoryNotEmpty(path.clone()));
        }
        self.unlink(id, path);
        Ok(())
    }

    fn unlink(&mut self, id: NodeId, path: &VfsPath) {
        if let Some(entry) = self.entries.remove(&id) {
            if let Some(parent) = entry.parent().and_then(|p| self.entry_mut(p)) {
                parent.remove_child(id);
            }
        }
        self.index.remove(path);
        log::trace!("index: - {path}");
    }

    /// Removes `id` and everything below it, children before parents.
    pub fn remove_subtree(&mut self, id: NodeId) -> Result<()> {
        if id == self.root {
            return Err(VfsError::ActionNotAllowed(VfsPath::root()));
        }
        let path = self.path_of(id)?;
        self.walk_ids_mut(id, false, &mut |store, child| {
            store.remove_subtree(child)?;
            Ok(true)
        })?;
        self.unlink(id, &path);
        Ok(())
    }

    /// Structural rename: re-points `id` under the parent of `dest` with the
    /// name of `dest`. Descendants follow through their parent links; only
    /// the index is rewritten for them. Whatever occupies `dest` is destroyed
    /// first.
    ///
    /// Fails before changing anything if `dest` lies inside the moved subtree,
    /// if its parent is not a directory, or if the occupant of `dest` contains
    /// `id`.
    pub fn relocate(&mut self, id: NodeId, dest: &VfsPath) -> Result<()> {
        let from = self.path_of(id)?;
        if &from == dest {
            return Ok(());
        }
        self.check_relocation(id, &from, dest, dest)?;

        if let Some(occupant) = self.lookup(dest) {
            log::debug!("replacing {dest} with {from}");
            self.remove_subtree(occupant)?;
        }

        let subtree = self.subtree(id)?;
        for node in &subtree {
            let old = self.path_of(*node)?;
            self.index.remove(&old);
        }

        let new_parent = self.must_be_dir(&dest.parent())?;
        let old_parent = self.existing(id)?.parent();
        if let Some(old_parent) = old_parent {
            if let Some(parent) = self.entry_mut(old_parent) {
                parent.remove_child(id);
            }
        }
        if let Some(entry) = self.entry_mut(id) {
            entry.relink(dest.name(), new_parent);
        }
        if let Some(parent) = self.entry_mut(new_parent) {
            parent.add_child(id);
        }

        for node in subtree {
            let new = self.path_of(node)?;
            log::trace!("index: ~ {new}");
            self.index.insert(new, node);
        }
        Ok(())
    }

    /// Read-only legality check for moving the subtree at `from` (id `id`) to
    /// `dest`. `requested` is the user-facing destination used in errors.
    pub(crate) fn check_relocation(
        &self,
        id: NodeId,
        from: &VfsPath,
        dest: &VfsPath,
        requested: &VfsPath,
    ) -> Result<()> {
        let invalid = || VfsError::InvalidMove {
            from: from.clone(),
            to: requested.clone(),
        };
        if id == self.root {
            return Err(VfsError::ActionNotAllowed(from.clone()));
        }
        self.must_be_canonical(dest)?;
        if dest.starts_with(from) {
            return Err(invalid());
        }
        self.must_be_dir(&dest.parent())?;
        if self.exists(dest) && from.starts_with(dest) {
            return Err(invalid());
        }
        self.check_relocated_len(id, from, dest)
    }

    /// Every path of the subtree must still fit once `from` becomes `dest`.
    fn check_relocated_len(&self, id: NodeId, from: &VfsPath, dest: &VfsPath) -> Result<()> {
        let mut longest = 0;
        for node in self.subtree(id)? {
            longest = longest.max(self.path_of(node)?.as_str().len());
        }
        let len = dest.as_str().len() + longest - from.as_str().len();
        if len > self.resolver.max_len() {
            return Err(VfsError::PathTooDeep {
                len,
                max: self.resolver.max_len(),
            });
        }
        Ok(())
    }

    /// `id` followed by all its descendants, pre-order.
    pub fn subtree(&self, id: NodeId) -> Result<Vec<NodeId>> {
        self.existing(id)?;
        let mut nodes = vec![id];
        self.walk_ids(id, true, &mut |child, _| {
            nodes.push(child);
            true
        });
        Ok(nodes)
    }

    /// File length, or the total length of all files below a directory.
    pub fn size_of(&self, id: NodeId) -> Result<usize> {
        let mut size = 0;
        for node in self.subtree(id)? {
            size += self.existing(node)?.content().map_or(0, <[u8]>::len);
        }
        Ok(size)
    }

    pub fn metadata(&self, path: &VfsPath) -> Result<Metadata> {
        let id = self.must_exist(path)?;
        let entry = self.existing(id)?;
        Ok(Metadata {
            path: path.clone(),
            entry_type: entry.entry_type(),
            size: self.size_of(id)?,
            created: entry.created(),
            modified: entry.modified(),
        })
    }

    /// Removes every entry except the root.
    pub fn clear(&mut self) -> Result<()> {
        let children = self.existing(self.root)?.children().to_vec();
        for child in children {
            self.remove_subtree(child)?;
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        assert!(self.is_dir_id(self.root), "root must be a directory");
        assert_eq!(self.index.len(), self.entries.len(), "index out of step");
        for (id, entry) in &self.entries {
            let path = self.path_of(*id).unwrap();
            assert_eq!(self.index.get(&path), Some(id), "index misses {path}");
            if let Some(parent) = entry.parent() {
                let parent_entry = self.entry(parent).unwrap();
                assert!(parent_entry.is_dir(), "parent of {path} is a file");
                let hits = parent_entry.children().iter().filter(|c| *c == id).count();
                assert_eq!(hits, 1, "{path} listed {hits} times by its parent");
            }
            for child in entry.children() {
                assert_eq!(self.entry(*child).unwrap().parent(), Some(*id));
            }
        }
    }
}
