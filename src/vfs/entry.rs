use chrono::{DateTime, Utc};

use crate::path::VfsPath;

/// Stable identifier of an entry inside a [`NodeStore`](super::NodeStore).
/// Identifiers are never reused within one store.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u64);

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EntryType {
    File,
    Directory,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum EntryKind {
    File { content: Vec<u8> },
    /// Children in insertion order, no duplicates.
    Directory { children: Vec<NodeId> },
}

/// A file or directory owned by the store.
///
/// An entry knows only its local `name` and its `parent`; the canonical path is
/// derived by walking parent links (see [`NodeStore::path_of`](super::NodeStore::path_of)).
#[derive(Debug, Clone)]
pub struct Entry {
    name: String,
    parent: Option<NodeId>,
    kind: EntryKind,
    created: DateTime<Utc>,
    modified: DateTime<Utc>,
}

impl Entry {
    fn new(name: &str, parent: Option<NodeId>, kind: EntryKind) -> Entry {
        let now = Utc::now();
        Entry {
            name: name.to_string(),
            parent,
            kind,
            created: now,
            modified: now,
        }
    }

    pub(crate) fn directory(name: &str, parent: Option<NodeId>) -> Entry {
        Self::new(name, parent, EntryKind::Directory { children: Vec::new() })
    }

    pub(crate) fn file(name: &str, parent: NodeId) -> Entry {
        Self::new(name, Some(parent), EntryKind::File { content: Vec::new() })
    }

    pub fn entry_type(&self) -> EntryType {
        match self.kind {
            EntryKind::File { .. } => EntryType::File,
            EntryKind::Directory { .. } => EntryType::Directory,
        }
    }

    pub fn is_file(&self) -> bool {
        self.entry_type() == EntryType::File
    }

    pub fn is_dir(&self) -> bool {
        self.entry_type() == EntryType::Directory
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `None` only for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    pub fn modified(&self) -> DateTime<Utc> {
        self.modified
    }

    /// File bytes; `None` for directories.
    pub fn content(&self) -> Option<&[u8]> {
        match &self.kind {
            EntryKind::File { content } => Some(content),
            EntryKind::Directory { .. } => None,
        }
    }

    /// Child ids in insertion order; empty for files.
    pub fn children(&self) -> &[NodeId] {
        match &self.kind {
            EntryKind::Directory { children } => children,
            EntryKind::File { .. } => &[],
        }
    }

    pub(crate) fn touch(&mut self) {
        self.modified = Utc::now();
    }

    pub(crate) fn relink(&mut self, name: &str, parent: NodeId) {
        self.name = name.to_string();
        self.parent = Some(parent);
        self.touch();
    }

    /// Replaces the file content. Returns `false` for directories.
    pub(crate) fn set_content(&mut self, data: &[u8]) -> bool {
        match &mut self.kind {
            EntryKind::File { content } => {
                content.clear();
                content.extend_from_slice(data);
                self.modified = Utc::now();
                true
            }
            EntryKind::Directory { .. } => false,
        }
    }

    /// Appends to the file content. Returns `false` for directories.
    pub(crate) fn append_content(&mut self, data: &[u8]) -> bool {
        match &mut self.kind {
            EntryKind::File { content } => {
                content.extend_from_slice(data);
                self.modified = Utc::now();
                true
            }
            EntryKind::Directory { .. } => false,
        }
    }

    pub(crate) fn add_child(&mut self, id: NodeId) {
        if let EntryKind::Directory { children } = &mut self.kind {
            if !children.contains(&id) {
                children.push(id);
            }
            self.modified = Utc::now();
        }
    }

    pub(crate) fn remove_child(&mut self, id: NodeId) {
        if let EntryKind::Directory { children } = &mut self.kind {
            children.retain(|child| *child != id);
            self.modified = Utc::now();
        }
    }
}

/// A snapshot of an entry's attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Metadata {
    pub path: VfsPath,
    pub entry_type: EntryType,
    /// Content length for files, total size of all descendant files for directories.
    pub size: usize,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl Metadata {
    pub fn is_file(&self) -> bool {
        self.entry_type == EntryType::File
    }

    pub fn is_dir(&self) -> bool {
        self.entry_type == EntryType::Directory
    }
}
