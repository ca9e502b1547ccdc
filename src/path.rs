//! Path parsing and resolution.
//!
//! A [`VfsPath`] is an ordered list of name components plus an absolute flag.
//! Its identity is the canonical `/`-joined string: equality, ordering and
//! hashing all go through [`VfsPath::as_str`], case-sensitively.
//!
//! [`PathResolver`] owns the length limit and turns user input into canonical
//! absolute paths, collapsing `.` and `..` (the parent of `/` is `/`).

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::core::Result;
use crate::error::VfsError;

/// Default upper bound for the length of a path string.
pub const MAX_PATH_LEN: usize = 1000;

const SEPARATOR: char = '/';
const CUR_DIR: &str = ".";
const PARENT_DIR: &str = "..";

#[derive(Debug, Clone)]
pub struct VfsPath {
    text: String,
    parts: Vec<String>,
    absolute: bool,
}

impl VfsPath {
    /// The root directory `/`.
    pub fn root() -> Self {
        Self::from_parts(true, Vec::new())
    }

    /// Parses `s` with the default length limit.
    pub fn parse(s: &str) -> Result<Self> {
        PathResolver::default().parse(s)
    }

    /// Builds an absolute path from already validated names, root first.
    pub(crate) fn from_names(names: Vec<String>) -> Self {
        Self::from_parts(true, names)
    }

    fn from_parts(absolute: bool, parts: Vec<String>) -> Self {
        let joined = parts.join("/");
        let text = if absolute {
            format!("{SEPARATOR}{joined}")
        } else {
            joined
        };
        Self {
            text,
            parts,
            absolute,
        }
    }

    /// Canonical string form.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_absolute(&self) -> bool {
        self.absolute
    }

    pub fn is_root(&self) -> bool {
        self.absolute && self.parts.is_empty()
    }

    /// Absolute and free of `.` and `..` components, i.e. the form the store
    /// keys entries by.
    pub fn is_canonical(&self) -> bool {
        self.absolute
            && self
                .parts
                .iter()
                .all(|part| part != CUR_DIR && part != PARENT_DIR)
    }

    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(String::as_str)
    }

    /// Number of name components (0 for the root).
    pub fn depth(&self) -> usize {
        self.parts.len()
    }

    /// Drops the last component. The parent of `/` is `/`; the parent of a
    /// single-component relative path is `.`.
    pub fn parent(&self) -> VfsPath {
        if self.parts.len() <= 1 && !self.absolute {
            return Self::from_parts(false, vec![CUR_DIR.to_string()]);
        }
        let mut parts = self.parts.clone();
        parts.pop();
        Self::from_parts(self.absolute, parts)
    }

    /// Last component, `""` for the root.
    pub fn name(&self) -> &str {
        self.parts.last().map(String::as_str).unwrap_or("")
    }

    /// Appends a relative suffix using the default length limit.
    pub fn extend(&self, relative: &str) -> Result<VfsPath> {
        PathResolver::default().extend(self, relative)
    }

    /// Resolves `other` against `self` using the default length limit.
    pub fn resolve(&self, other: &VfsPath) -> Result<VfsPath> {
        PathResolver::default().resolve(self, other)
    }

    /// Component-wise prefix test: `/a/b` starts with `/a` but not with `/a/b` + `c`.
    pub fn starts_with(&self, other: &VfsPath) -> bool {
        self.absolute == other.absolute
            && self.parts.len() >= other.parts.len()
            && self.parts.iter().zip(&other.parts).all(|(a, b)| a == b)
    }
}

impl PartialEq for VfsPath {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for VfsPath {}

impl Hash for VfsPath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text.hash(state);
    }
}

impl PartialOrd for VfsPath {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for VfsPath {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.text.cmp(&other.text)
    }
}

impl fmt::Display for VfsPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl AsRef<str> for VfsPath {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl FromStr for VfsPath {
    type Err = VfsError;

    fn from_str(s: &str) -> Result<Self> {
        VfsPath::parse(s)
    }
}

/// Turns path strings into canonical paths under a length limit.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PathResolver {
    max_len: usize,
}

impl Default for PathResolver {
    fn default() -> Self {
        Self::new(MAX_PATH_LEN)
    }
}

impl PathResolver {
    pub fn new(max_len: usize) -> Self {
        Self { max_len }
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Splits `s` into components. Empty components (from `//` or a trailing
    /// `/`) are dropped; `.` and `..` are kept for [`PathResolver::resolve`].
    pub fn parse(&self, s: &str) -> Result<VfsPath> {
        if s.is_empty() {
            return Err(VfsError::invalid_path(s, "empty"));
        }
        self.check_len(s.len())?;
        let absolute = s.starts_with(SEPARATOR);
        let parts: Vec<String> = s
            .split(SEPARATOR)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect();
        Ok(VfsPath::from_parts(absolute, parts))
    }

    /// If `other` is absolute it is resolved alone, otherwise it is appended
    /// to `base`. The result is always a canonical absolute path.
    pub fn resolve(&self, base: &VfsPath, other: &VfsPath) -> Result<VfsPath> {
        let levels: Vec<&String> = if other.is_absolute() {
            other.parts.iter().collect()
        } else {
            base.parts.iter().chain(&other.parts).collect()
        };

        let mut resolved: Vec<String> = Vec::new();
        for part in levels {
            match part.as_str() {
                CUR_DIR => {}
                PARENT_DIR => {
                    resolved.pop();
                }
                name => resolved.push(name.to_string()),
            }
        }

        let path = VfsPath::from_parts(true, resolved);
        self.check_len(path.as_str().len())?;
        Ok(path)
    }

    /// Parses `s` and resolves it against `base`.
    pub fn resolve_str(&self, base: &VfsPath, s: &str) -> Result<VfsPath> {
        let other = self.parse(s)?;
        self.resolve(base, &other)
    }

    /// Appends the relative suffix `relative` to `path`.
    pub fn extend(&self, path: &VfsPath, relative: &str) -> Result<VfsPath> {
        if relative.is_empty() {
            return Err(VfsError::invalid_path(relative, "empty suffix"));
        }
        if relative.starts_with(SEPARATOR) {
            return Err(VfsError::invalid_path(
                relative,
                "expected a relative suffix",
            ));
        }
        let mut parts = path.parts.clone();
        for part in relative.split(SEPARATOR).filter(|part| !part.is_empty()) {
            if part == CUR_DIR || part == PARENT_DIR {
                return Err(VfsError::invalid_path(
                    relative,
                    "`.` and `..` are not names",
                ));
            }
            parts.push(part.to_string());
        }
        let extended = VfsPath::from_parts(path.absolute, parts);
        self.check_len(extended.as_str().len())?;
        Ok(extended)
    }

    fn check_len(&self, len: usize) -> Result<()> {
        if len > self.max_len {
            return Err(VfsError::PathTooDeep {
                len,
                max: self.max_len,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn abs(s: &str) -> VfsPath {
        VfsPath::parse(s).unwrap()
    }

    mod parse {
        use super::*;

        #[test]
        fn test_parse_absolute() {
            let p = abs("/foo/bar");
            assert!(p.is_absolute());
            assert_eq!(p.as_str(), "/foo/bar");
            assert_eq!(p.components().collect::<Vec<_>>(), vec!["foo", "bar"]);
        }

        #[test]
        fn test_parse_relative() {
            let p = abs("foo/./bar");
            assert!(!p.is_absolute());
            assert_eq!(p.as_str(), "foo/./bar");
            assert_eq!(p.depth(), 3);
        }

        #[test]
        fn test_parse_drops_empty_components() {
            assert_eq!(abs("//foo//bar/").as_str(), "/foo/bar");
            assert!(abs("///").is_root());
        }

        #[test]
        fn test_parse_empty_is_invalid() {
            let err = VfsPath::parse("").unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidPath);
        }

        #[test]
        fn test_parse_too_long() {
            let long = format!("/{}", "a".repeat(MAX_PATH_LEN));
            let err = VfsPath::parse(&long).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::PathTooDeep);

            let fits = format!("/{}", "a".repeat(MAX_PATH_LEN - 1));
            assert!(VfsPath::parse(&fits).is_ok());
        }

        #[test]
        fn test_parse_case_sensitive() {
            assert_ne!(abs("/Foo"), abs("/foo"));
        }

        #[test]
        fn test_from_str() {
            let p: VfsPath = "/a/b".parse().unwrap();
            assert_eq!(p, abs("/a/b"));
        }
    }

    mod resolve {
        use super::*;

        #[test]
        fn test_resolve_relative_against_base() -> Result<()> {
            let base = abs("/foo/bar");
            assert_eq!(base.resolve(&abs("baz"))?.as_str(), "/foo/bar/baz");
            assert_eq!(base.resolve(&abs("../foobar"))?.as_str(), "/foo/foobar");
            assert_eq!(base.resolve(&abs("./x/./y"))?.as_str(), "/foo/bar/x/y");
            Ok(())
        }

        #[test]
        fn test_resolve_absolute_ignores_base() -> Result<()> {
            let base = abs("/foo/bar");
            assert_eq!(base.resolve(&abs("/baz/../qux"))?.as_str(), "/qux");
            Ok(())
        }

        #[test]
        fn test_resolve_parent_of_root_is_root() -> Result<()> {
            let root = VfsPath::root();
            assert!(root.resolve(&abs(".."))?.is_root());
            assert!(root.resolve(&abs("../../.."))?.is_root());
            assert_eq!(root.resolve(&abs("/../a/../../b"))?.as_str(), "/b");
            Ok(())
        }

        #[test]
        fn test_resolve_dot_is_base() -> Result<()> {
            let base = abs("/foo");
            assert_eq!(base.resolve(&abs("."))?, base);
            Ok(())
        }

        #[test]
        fn test_resolve_respects_limit() {
            let resolver = PathResolver::new(8);
            let base = resolver.parse("/abc").unwrap();
            let other = resolver.parse("defgh").unwrap();
            let err = resolver.resolve(&base, &other).unwrap_err();
            assert_eq!(err, VfsError::PathTooDeep { len: 10, max: 8 });
        }
    }

    mod parent_name_extend {
        use super::*;

        #[test]
        fn test_parent() {
            assert_eq!(abs("/foo/bar").parent().as_str(), "/foo");
            assert!(abs("/foo").parent().is_root());
            assert!(VfsPath::root().parent().is_root());
            assert_eq!(abs("a/b").parent().as_str(), "a");
        }

        #[test]
        fn test_name() {
            assert_eq!(abs("/foo/bar/baz.txt").name(), "baz.txt");
            assert_eq!(VfsPath::root().name(), "");
        }

        #[test]
        fn test_extend() -> Result<()> {
            assert_eq!(VfsPath::root().extend("foo")?.as_str(), "/foo");
            assert_eq!(abs("/foo").extend("bar/baz")?.as_str(), "/foo/bar/baz");
            Ok(())
        }

        #[test]
        fn test_extend_rejects_absolute_suffix() {
            let err = abs("/foo").extend("/bar").unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidPath);
            let err = abs("/foo").extend("").unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidPath);
        }

        #[test]
        fn test_extend_rejects_dot_components() {
            for suffix in [".", "..", "bar/..", "./bar"] {
                let err = abs("/foo").extend(suffix).unwrap_err();
                assert_eq!(err.kind(), ErrorKind::InvalidPath, "{suffix}");
            }
        }

        #[test]
        fn test_is_canonical() {
            assert!(VfsPath::root().is_canonical());
            assert!(abs("/foo/bar").is_canonical());
            assert!(!abs("/foo/..").is_canonical());
            assert!(!abs("/./foo").is_canonical());
            assert!(!abs("foo").is_canonical());
        }

        #[test]
        fn test_starts_with_respects_boundaries() {
            assert!(abs("/foo/bar").starts_with(&abs("/foo")));
            assert!(abs("/foo").starts_with(&abs("/foo")));
            assert!(abs("/foo").starts_with(&VfsPath::root()));
            assert!(!abs("/foobar").starts_with(&abs("/foo")));
        }
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn name_strategy() -> impl Strategy<Value = String> {
            "[a-zA-Z0-9_-]{1,12}"
        }

        fn segment_strategy() -> impl Strategy<Value = String> {
            prop_oneof![
                4 => name_strategy(),
                1 => Just(".".to_string()),
                1 => Just("..".to_string()),
            ]
        }

        proptest! {
            #[test]
            fn parent_extend_name_roundtrip(parts in prop::collection::vec(name_strategy(), 1..10)) {
                let path = abs(&format!("/{}", parts.join("/")));
                let rebuilt = path.parent().extend(path.name()).unwrap();
                prop_assert_eq!(rebuilt, path);
            }

            #[test]
            fn resolve_is_idempotent(
                base in prop::collection::vec(name_strategy(), 0..6),
                segments in prop::collection::vec(segment_strategy(), 1..10),
                absolute in any::<bool>(),
            ) {
                let base = abs(&format!("/{}", base.join("/")));
                let raw = segments.join("/");
                let raw = if absolute { format!("/{raw}") } else { raw };
                let once = base.resolve(&abs(&raw)).unwrap();
                let twice = base.resolve(&once).unwrap();
                prop_assert!(once.is_absolute());
                prop_assert!(once.components().all(|c| c != "." && c != ".."));
                prop_assert_eq!(twice, once);
            }
        }
    }
}
