//! An in-memory, hierarchical, path-addressed virtual file system (VFS).
//! Emulates POSIX-like directories and files without touching real storage.
//! Ideal for testing and sandboxing logic that depends on hierarchical naming.
//!
//! ### Overview
//!
//! - [`VfsPath`] / [`PathResolver`]: parse path strings and resolve `.` / `..`
//!   against a base (the parent of `/` is `/`).
//! - [`NodeStore`]: an arena of [`Entry`] values with a canonical-path index.
//!   It offers the tree mutations (`mkdir`, `mkfile`, `write`, `rm`, `mv`,
//!   `merge_dir`) and a snapshotting directory walker.
//! - [`TreeFS`]: the [`FsBackend`] façade with a current working directory,
//!   taking and returning plain path strings.
//!
//! **Key ideas**:
//! - **All or nothing**: every operation validates its whole scope before it
//!   changes anything, recursive ones included.
//! - **Structural moves**: moving a directory re-points one parent link; no
//!   path strings are rewritten.
//! - **Typed errors**: each failed precondition has its own [`VfsError`] variant
//!   naming the offending path.
//!
//! ```
//! use vfs_tree::{FsBackend, TreeFS};
//!
//! let mut fs = TreeFS::new();
//! fs.mkdir("/foo/bar/baz", true).unwrap();
//! assert_eq!(fs.ls(Some("/foo")).unwrap(), vec!["bar"]);
//!
//! fs.write("/foo/bar/note.txt", b"hello", false).unwrap_err();
//! fs.write("/foo/bar/note.txt", b"hello", true).unwrap();
//! fs.mv("/foo/bar", "/moved", false).unwrap();
//! assert_eq!(fs.read("/moved/note.txt").unwrap(), b"hello");
//! ```

mod core;
mod error;
mod path;
mod vfs;

pub use self::core::{FsBackend, Result};
pub use error::{ErrorKind, VfsError};
pub use path::{MAX_PATH_LEN, PathResolver, VfsPath};
pub use vfs::{Entry, EntryType, FsConfig, Metadata, NodeId, NodeStore, TreeFS};
