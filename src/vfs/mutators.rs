//! Tree mutations on canonical absolute paths.
//!
//! Each operation validates its whole scope first and only then mutates, so a
//! failing call leaves the store untouched. Recursive operations (`rm`, `mv`,
//! `merge_dir`) validate the full subtree they are about to touch.

use crate::core::Result;
use crate::error::VfsError;
use crate::path::VfsPath;

use super::entry::{EntryType, NodeId};
use super::store::NodeStore;

impl NodeStore {
    /// Creates a directory. With `recursive`, missing ancestors are created
    /// top-down first.
    pub fn mkdir(&mut self, path: &VfsPath, recursive: bool) -> Result<NodeId> {
        let id = self.add_entry(path, EntryType::Directory, recursive)?;
        log::debug!("mkdir {path}");
        Ok(id)
    }

    /// Creates an empty file. With `recursive`, missing ancestors are created
    /// top-down first.
    pub fn mkfile(&mut self, path: &VfsPath, recursive: bool) -> Result<NodeId> {
        let id = self.add_entry(path, EntryType::File, recursive)?;
        log::debug!("mkfile {path}");
        Ok(id)
    }

    fn add_entry(&mut self, path: &VfsPath, entry_type: EntryType, recursive: bool) -> Result<NodeId> {
        self.must_not_exist(path)?;
        let parent = path.parent();
        let missing = if recursive {
            self.missing_ancestors(&parent)?
        } else {
            self.must_be_dir(&parent)?;
            Vec::new()
        };
        for dir in &missing {
            self.insert(dir, EntryType::Directory)?;
        }
        self.insert(path, entry_type)
    }

    /// Directories on the way down to `dir` that do not exist yet, root first.
    /// Fails if an existing one is a file.
    fn missing_ancestors(&self, dir: &VfsPath) -> Result<Vec<VfsPath>> {
        let mut missing = Vec::new();
        let mut current = VfsPath::root();
        for name in dir.components() {
            current = self.resolver().extend(&current, name)?;
            match self.lookup(&current) {
                Some(id) if !self.is_dir_id(id) => {
                    return Err(VfsError::PathNotDirectory(current));
                }
                Some(_) => {}
                None => missing.push(current.clone()),
            }
        }
        Ok(missing)
    }

    pub fn read(&self, path: &VfsPath) -> Result<&[u8]> {
        let id = self.must_be_file(path)?;
        Ok(self.existing(id)?.content().unwrap_or_default())
    }

    /// Replaces the content of the file at `path`. With `force`, a missing
    /// file (and its ancestors) is created first.
    pub fn write(&mut self, path: &VfsPath, content: &[u8], force: bool) -> Result<()> {
        if force && !self.exists(path) {
            self.mkfile(path, true)?;
        }
        let id = self.must_be_file(path)?;
        if !self.entry_mut(id).is_some_and(|entry| entry.set_content(content)) {
            return Err(VfsError::PathNotFile(path.clone()));
        }
        log::debug!("write {path} ({} bytes)", content.len());
        Ok(())
    }

    pub fn append(&mut self, path: &VfsPath, content: &[u8]) -> Result<()> {
        let id = self.must_be_file(path)?;
        if !self.entry_mut(id).is_some_and(|entry| entry.append_content(content)) {
            return Err(VfsError::PathNotFile(path.clone()));
        }
        log::debug!("append {path} ({} bytes)", content.len());
        Ok(())
    }

    /// Removes the entry at `path`. A non-empty directory needs `recursive`,
    /// in which case children go before their parents.
    pub fn rm(&mut self, path: &VfsPath, recursive: bool) -> Result<()> {
        let id = self.must_exist(path)?;
        if path.is_root() {
            return Err(VfsError::ActionNotAllowed(path.clone()));
        }
        if !recursive && !self.existing(id)?.children().is_empty() {
            return Err(VfsError::DirectoryNotEmpty(path.clone()));
        }
        self.remove_subtree(id)?;
        log::debug!("rm {path}");
        Ok(())
    }

    /// Moves the entry at `from`.
    ///
    /// * Nothing at `to`: `from` is renamed to `to`.
    /// * `to` is a directory without a child named like `from` (or `force` is
    ///   set): `from` is moved into it.
    /// * Otherwise the move needs `force`, and whatever occupies `to` is
    ///   replaced.
    pub fn mv(&mut self, from: &VfsPath, to: &VfsPath, force: bool) -> Result<()> {
        let id = self.must_exist(from)?;
        self.must_be_canonical(to)?;
        if from.is_root() {
            return Err(VfsError::ActionNotAllowed(from.clone()));
        }

        let dest = match self.lookup(to) {
            None => to.clone(),
            Some(occupant)
                if self.is_dir_id(occupant)
                    && (force || self.child_named(occupant, from.name()).is_none()) =>
            {
                self.resolver().extend(to, from.name())?
            }
            Some(_) if !force => {
                return Err(VfsError::InvalidMove {
                    from: from.clone(),
                    to: to.clone(),
                });
            }
            Some(_) => to.clone(),
        };

        if &dest == from {
            return Ok(());
        }
        self.check_relocation(id, from, &dest, to)?;
        self.relocate(id, &dest)?;
        log::debug!("mv {from} -> {dest}");
        Ok(())
    }

    /// Merges the directory `from` into the directory `to`, then removes
    /// `from`. Directories present on both sides are merged recursively; on
    /// any other name clash the entry from `from` replaces the one in `to`.
    pub fn merge_dir(&mut self, from: &VfsPath, to: &VfsPath) -> Result<()> {
        let src = self.must_be_dir(from)?;
        self.must_be_dir(to)?;
        if from.is_root() {
            return Err(VfsError::ActionNotAllowed(from.clone()));
        }
        if to.starts_with(from) {
            return Err(VfsError::InvalidMove {
                from: from.clone(),
                to: to.clone(),
            });
        }

        self.check_merge(src, from, to, from)?;
        self.merge_validated(from, to)?;
        log::debug!("merge {from} -> {to}");
        Ok(())
    }

    /// Dry run of [`NodeStore::merge_dir`] below `dir` (at `dir_path`) into
    /// `target`. `origin` is the top-level source, which no destination may
    /// contain.
    fn check_merge(&self, dir: NodeId, dir_path: &VfsPath, target: &VfsPath, origin: &VfsPath) -> Result<()> {
        for child in self.existing(dir)?.children() {
            let entry = self.existing(*child)?;
            let child_path = self.resolver().extend(dir_path, entry.name())?;
            let dest = self.resolver().extend(target, entry.name())?;
            if origin.starts_with(&dest) {
                return Err(VfsError::InvalidMove {
                    from: child_path,
                    to: dest,
                });
            }
            match self.lookup(&dest) {
                Some(occupant) if entry.is_dir() && self.is_dir_id(occupant) => {
                    self.check_merge(*child, &child_path, &dest, origin)?;
                }
                _ => self.check_relocation(*child, &child_path, &dest, &dest)?,
            }
        }
        Ok(())
    }

    fn merge_validated(&mut self, from: &VfsPath, to: &VfsPath) -> Result<()> {
        self.walk_mut(from, false, |store, child| {
            let child_path = store.path_of(child)?;
            let dest = store.resolver().extend(to, child_path.name())?;
            match store.lookup(&dest) {
                Some(occupant) if store.is_dir_id(child) && store.is_dir_id(occupant) => {
                    store.merge_validated(&child_path, &dest)?;
                }
                _ => store.relocate(child, &dest)?,
            }
            Ok(true)
        })?;
        let id = self.must_be_dir(from)?;
        self.remove_subtree(id)
    }
}
