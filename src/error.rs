//! Error types of the virtual file system.
//!
//! Every failure is a caller precondition violation: nothing here is transient
//! and nothing should be retried.

use thiserror::Error;

use crate::path::VfsPath;

/// A copyable tag of [`VfsError`], convenient for matching.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    PathDoesNotExist,
    PathAlreadyExists,
    PathNotFile,
    PathNotDirectory,
    DirectoryNotEmpty,
    ActionNotAllowed,
    InvalidMove,
    InvalidPath,
    PathTooDeep,
}

/// The error type of all VFS operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VfsError {
    #[error("the path '{0}' does not exist")]
    PathDoesNotExist(VfsPath),

    #[error("the path '{0}' already exists")]
    PathAlreadyExists(VfsPath),

    #[error("the path '{0}' is not a file")]
    PathNotFile(VfsPath),

    #[error("the path '{0}' is not a directory")]
    PathNotDirectory(VfsPath),

    #[error("the path '{0}' is not empty")]
    DirectoryNotEmpty(VfsPath),

    /// The operation targets the root where that is disallowed.
    #[error("this action on '{0}' is not allowed")]
    ActionNotAllowed(VfsPath),

    #[error("cannot move '{from}' to '{to}'")]
    InvalidMove {
        /// Source of the move.
        from: VfsPath,
        /// Requested destination.
        to: VfsPath,
    },

    #[error("invalid path '{path}': {reason}")]
    InvalidPath {
        /// The raw, unparsed input.
        path: String,
        /// Why it was rejected.
        reason: String,
    },

    #[error("path is too deep: {len} characters (max {max})")]
    PathTooDeep {
        /// Length of the canonical form.
        len: usize,
        /// Configured limit.
        max: usize,
    },
}

impl VfsError {
    pub(crate) fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        VfsError::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            VfsError::PathDoesNotExist(_) => ErrorKind::PathDoesNotExist,
            VfsError::PathAlreadyExists(_) => ErrorKind::PathAlreadyExists,
            VfsError::PathNotFile(_) => ErrorKind::PathNotFile,
            VfsError::PathNotDirectory(_) => ErrorKind::PathNotDirectory,
            VfsError::DirectoryNotEmpty(_) => ErrorKind::DirectoryNotEmpty,
            VfsError::ActionNotAllowed(_) => ErrorKind::ActionNotAllowed,
            VfsError::InvalidMove { .. } => ErrorKind::InvalidMove,
            VfsError::InvalidPath { .. } => ErrorKind::InvalidPath,
            VfsError::PathTooDeep { .. } => ErrorKind::PathTooDeep,
        }
    }

    /// Returns the path the error is about, if it names exactly one.
    pub fn path(&self) -> Option<&VfsPath> {
        match self {
            VfsError::PathDoesNotExist(p)
            | VfsError::PathAlreadyExists(p)
            | VfsError::PathNotFile(p)
            | VfsError::PathNotDirectory(p)
            | VfsError::DirectoryNotEmpty(p)
            | VfsError::ActionNotAllowed(p) => Some(p),
            VfsError::InvalidMove { from, .. } => Some(from),
            VfsError::InvalidPath { .. } | VfsError::PathTooDeep { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_path() {
        let p = VfsPath::root().extend("foo").unwrap();
        assert_eq!(
            VfsError::PathDoesNotExist(p.clone()).to_string(),
            "the path '/foo' does not exist"
        );
        assert_eq!(
            VfsError::DirectoryNotEmpty(p.clone()).to_string(),
            "the path '/foo' is not empty"
        );
        let err = VfsError::InvalidMove {
            from: p,
            to: VfsPath::root(),
        };
        assert_eq!(err.to_string(), "cannot move '/foo' to '/'");
        assert_eq!(err.kind(), ErrorKind::InvalidMove);
    }

    #[test]
    fn test_path_accessor() {
        let err = VfsError::invalid_path("", "empty");
        assert!(err.path().is_none());
        assert_eq!(err.kind(), ErrorKind::InvalidPath);

        let err = VfsError::ActionNotAllowed(VfsPath::root());
        assert_eq!(err.path().map(|p| p.as_str()), Some("/"));
    }
}
