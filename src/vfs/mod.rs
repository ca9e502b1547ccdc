mod entry;
mod mutators;
mod store;
mod tree_fs;
mod walker;

pub use entry::{Entry, EntryType, Metadata, NodeId};
pub use store::NodeStore;
pub use tree_fs::{FsConfig, TreeFS};
