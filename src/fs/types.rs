//! Core VFS types: entries, stat records, directory listings and the
//! [`FileSystem`] trait every store implements.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::FsError;

/// A node in the tree. Content is text-only; there is no binary/symlink
/// support in this store (unlike the fuller filesystems this one is
/// descended from).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Entry {
    File { content: String, ctime: i64, mtime: i64 },
    Directory { ctime: i64, mtime: i64 },
}

impl Entry {
    pub fn is_file(&self) -> bool {
        matches!(self, Entry::File { .. })
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, Entry::Directory { .. })
    }

    pub fn mtime(&self) -> i64 {
        match self {
            Entry::File { mtime, .. } => *mtime,
            Entry::Directory { mtime, .. } => *mtime,
        }
    }

    pub fn ctime(&self) -> i64 {
        match self {
            Entry::File { ctime, .. } => *ctime,
            Entry::Directory { ctime, .. } => *ctime,
        }
    }
}

/// Kind tag used by `stat`/`readdir` results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    File,
    Directory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stat {
    pub kind: EntryKind,
    pub size: usize,
    pub ctime: i64,
    pub mtime: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirEntry {
    pub name: String,
    pub kind: EntryKind,
}

/// Options shared by `rm`-style recursive removal.
#[derive(Debug, Clone, Copy, Default)]
pub struct RmOptions {
    pub recursive: bool,
}

/// The storage contract every VFS backend implements. Async purely to model
/// a suspension point the way the rest of this crate's command layer does —
/// there is no real I/O latency behind an in-memory store.
#[async_trait]
pub trait FileSystem: Send + Sync {
    async fn read_file(&self, path: &str) -> Result<String, FsError>;
    async fn write_file(&self, path: &str, content: &str) -> Result<(), FsError>;
    async fn append_file(&self, path: &str, content: &str) -> Result<(), FsError>;
    async fn exists(&self, path: &str) -> bool;
    async fn stat(&self, path: &str) -> Result<Stat, FsError>;
    async fn mkdir(&self, path: &str, recursive: bool) -> Result<(), FsError>;
    async fn readdir(&self, path: &str) -> Result<Vec<DirEntry>, FsError>;
    async fn remove(&self, path: &str, options: RmOptions) -> Result<(), FsError>;
    async fn copy_file(&self, src: &str, dst: &str) -> Result<(), FsError>;
    async fn rename(&self, src: &str, dst: &str) -> Result<(), FsError>;

    /// Resolve `path` (which may be relative) against `cwd`, collapsing
    /// `.`/`..` segments. Never touches the store.
    fn resolve(&self, cwd: &str, path: &str) -> String {
        super::memory::resolve_path(cwd, path)
    }
}
