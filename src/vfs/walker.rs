//! Directory traversal.
//!
//! Both walkers copy a directory's child list before visiting it, so a visitor
//! may add, remove or move entries of the directory being walked. Children
//! that disappear before their turn are skipped. Traversal is depth-first and
//! pre-order; returning `false` from a visitor ends the whole walk.

use crate::core::Result;
use crate::path::VfsPath;

use super::entry::{Entry, NodeId};
use super::store::NodeStore;

impl NodeStore {
    /// Visits the children of the directory at `dir` (all descendants when
    /// `recursive`).
    pub fn walk<F>(&self, dir: &VfsPath, recursive: bool, mut visit: F) -> Result<()>
    where
        F: FnMut(NodeId, &Entry) -> bool,
    {
        let id = self.must_be_dir(dir)?;
        self.walk_ids(id, recursive, &mut visit);
        Ok(())
    }

    /// Like [`NodeStore::walk`], but the visitor gets the store itself and may
    /// mutate it. A visitor error aborts the walk and is returned.
    pub fn walk_mut<F>(&mut self, dir: &VfsPath, recursive: bool, mut visit: F) -> Result<()>
    where
        F: FnMut(&mut NodeStore, NodeId) -> Result<bool>,
    {
        let id = self.must_be_dir(dir)?;
        self.walk_ids_mut(id, recursive, &mut visit)?;
        Ok(())
    }

    /// Returns `false` if the visitor stopped the walk.
    pub(crate) fn walk_ids<F>(&self, dir: NodeId, recursive: bool, visit: &mut F) -> bool
    where
        F: FnMut(NodeId, &Entry) -> bool,
    {
        let snapshot = match self.entry(dir) {
            Some(entry) => entry.children().to_vec(),
            None => return true,
        };
        for child in snapshot {
            let Some(entry) = self.entry(child) else {
                continue;
            };
            if !visit(child, entry) {
                return false;
            }
            if recursive && entry.is_dir() && !self.walk_ids(child, recursive, visit) {
                return false;
            }
        }
        true
    }

    /// Returns `Ok(false)` if the visitor stopped the walk.
    pub(crate) fn walk_ids_mut<F>(&mut self, dir: NodeId, recursive: bool, visit: &mut F) -> Result<bool>
    where
        F: FnMut(&mut NodeStore, NodeId) -> Result<bool>,
    {
        let snapshot = match self.entry(dir) {
            Some(entry) => entry.children().to_vec(),
            None => return Ok(true),
        };
        log::trace!("walk: {} children of #{}", snapshot.len(), dir.0);
        for child in snapshot {
            if !self.contains(child) {
                continue;
            }
            if !visit(self, child)? {
                return Ok(false);
            }
            if recursive && self.is_dir_id(child) && !self.walk_ids_mut(child, recursive, visit)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Names of the immediate children of the directory at `dir`.
    pub fn ls(&self, dir: &VfsPath) -> Result<Vec<String>> {
        let id = self.must_be_dir(dir)?;
        self.child_names(id)
    }

    /// Canonical paths of every descendant of `dir`, pre-order.
    pub fn tree(&self, dir: &VfsPath) -> Result<Vec<VfsPath>> {
        let mut found = Vec::new();
        self.walk(dir, true, |id, _| {
            found.push(id);
            true
        })?;
        found.into_iter().map(|id| self.path_of(id)).collect()
    }

    /// Canonical paths of the entries under `dir` named exactly `name`, in
    /// traversal order.
    pub fn find(&self, name: &str, dir: &VfsPath, recursive: bool) -> Result<Vec<VfsPath>> {
        let mut found = Vec::new();
        self.walk(dir, recursive, |id, entry| {
            if entry.name() == name {
                found.push(id);
            }
            true
        })?;
        found.into_iter().map(|id| self.path_of(id)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::vfs::EntryType;

    fn p(s: &str) -> VfsPath {
        VfsPath::parse(s).unwrap()
    }

    /// /a/{x, b/{x}}, /x
    fn setup_store() -> NodeStore {
        let mut store = NodeStore::new();
        store.insert(&p("/a"), EntryType::Directory).unwrap();
        store.insert(&p("/a/x"), EntryType::File).unwrap();
        store.insert(&p("/a/b"), EntryType::Directory).unwrap();
        store.insert(&p("/a/b/x"), EntryType::File).unwrap();
        store.insert(&p("/x"), EntryType::File).unwrap();
        store
    }

    fn names(store: &NodeStore, dir: &str, recursive: bool) -> Vec<String> {
        let mut seen = Vec::new();
        store
            .walk(&p(dir), recursive, |id, _| {
                seen.push(store.path_of(id).unwrap().to_string());
                true
            })
            .unwrap();
        seen
    }

    #[test]
    fn test_walk_shallow() {
        let store = setup_store();
        assert_eq!(names(&store, "/", false), vec!["/a", "/x"]);
    }

    #[test]
    fn test_walk_recursive_is_preorder() {
        let store = setup_store();
        assert_eq!(
            names(&store, "/", true),
            vec!["/a", "/a/x", "/a/b", "/a/b/x", "/x"]
        );
    }

    #[test]
    fn test_walk_stops_early() -> Result<()> {
        let store = setup_store();
        let mut count = 0;
        store.walk(&p("/"), true, |_, _| {
            count += 1;
            count < 3
        })?;
        assert_eq!(count, 3);
        Ok(())
    }

    #[test]
    fn test_walk_requires_directory() {
        let store = setup_store();
        let err = store.walk(&p("/x"), false, |_, _| true).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PathNotDirectory);
        let err = store.walk(&p("/nope"), false, |_, _| true).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PathDoesNotExist);
    }

    #[test]
    fn test_walk_mut_tolerates_removal_during_traversal() -> Result<()> {
        let mut store = setup_store();
        let mut visited = 0;
        store.walk_mut(&p("/"), false, |store, _child| {
            visited += 1;
            // the first visit drops every child, including ones not yet visited
            let root = store.root_id();
            let children = store.existing(root)?.children().to_vec();
            for id in children {
                store.remove_subtree(id)?;
            }
            Ok(true)
        })?;
        assert_eq!(visited, 1);
        assert!(store.is_empty());
        store.assert_consistent();
        Ok(())
    }

    #[test]
    fn test_walk_mut_sees_snapshot_only() -> Result<()> {
        let mut store = setup_store();
        let mut visited = Vec::new();
        store.walk_mut(&p("/a"), false, |store, child| {
            let path = store.path_of(child)?;
            visited.push(path.to_string());
            let extra = store.resolver().extend(&p("/a"), &format!("new-{}", path.name()))?;
            store.insert(&extra, EntryType::File)?;
            Ok(true)
        })?;
        assert_eq!(visited, vec!["/a/x", "/a/b"]);
        assert_eq!(store.ls(&p("/a"))?, vec!["x", "b", "new-x", "new-b"]);
        Ok(())
    }

    #[test]
    fn test_find() -> Result<()> {
        let store = setup_store();
        let found: Vec<String> = store
            .find("x", &p("/"), true)?
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(found, vec!["/a/x", "/a/b/x", "/x"]);
        assert_eq!(store.find("x", &p("/"), false)?, vec![p("/x")]);
        assert!(store.find("missing", &p("/"), true)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_tree() -> Result<()> {
        let store = setup_store();
        assert_eq!(store.tree(&p("/a/b"))?, vec![p("/a/b/x")]);
        assert_eq!(store.tree(&p("/"))?.len(), 5);
        Ok(())
    }
}
