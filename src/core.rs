use crate::error::VfsError;
use crate::vfs::Metadata;

pub type Result<T> = std::result::Result<T, VfsError>;

/// Path-string level surface of a virtual file system.
///
/// Every `path` may be absolute or relative to [`FsBackend::cwd`]; `.` and `..`
/// are resolved before anything is looked up.
pub trait FsBackend {
    fn cwd(&self) -> &str;
    fn cd(&mut self, path: &str) -> Result<()>;

    fn exists(&self, path: &str) -> bool;
    fn is_dir(&self, path: &str) -> Result<bool>;
    fn is_file(&self, path: &str) -> Result<bool>;
    fn metadata(&self, path: &str) -> Result<Metadata>;

    fn ls(&self, path: Option<&str>) -> Result<Vec<String>>;
    fn tree(&self, path: Option<&str>) -> Result<Vec<String>>;
    fn find(&self, name: &str, path: Option<&str>, recursive: bool) -> Result<Vec<String>>;

    fn mkdir(&mut self, path: &str, recursive: bool) -> Result<()>;
    fn mkfile(&mut self, path: &str, recursive: bool) -> Result<()>;
    fn read(&self, path: &str) -> Result<Vec<u8>>;
    fn write(&mut self, path: &str, content: &[u8], force: bool) -> Result<()>;
    fn append(&mut self, path: &str, content: &[u8]) -> Result<()>;

    fn rm(&mut self, path: &str, recursive: bool) -> Result<()>;
    fn mv(&mut self, from: &str, to: &str, force: bool) -> Result<()>;
    fn merge_dir(&mut self, from: &str, to: &str) -> Result<()>;

    /// Removes everything except the root.
    fn cleanup(&mut self) -> Result<()>;
}
