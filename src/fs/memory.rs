//! In-memory, path-keyed VFS backend.

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::error::FsError;
use super::types::{DirEntry, Entry, EntryKind, FileSystem, RmOptions, Stat};

/// Collapse `.`/`..` segments and resolve `path` against `cwd` if it isn't
/// already absolute. Always returns an absolute path with no trailing slash
/// (except the root itself, which is `"/"`).
pub fn resolve_path(cwd: &str, path: &str) -> String {
    let joined = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("{}/{}", cwd, path)
    };
    let mut stack: Vec<&str> = Vec::new();
    for seg in joined.split('/') {
        match seg {
            "" | "." => {}
            ".." => {
                stack.pop();
            }
            s => stack.push(s),
        }
    }
    if stack.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", stack.join("/"))
    }
}

/// Parent directory of `path` (`"/"` for top-level entries).
pub fn dirname(path: &str) -> String {
    if path == "/" {
        return "/".to_string();
    }
    match path.rfind('/') {
        Some(0) => "/".to_string(),
        Some(idx) => path[..idx].to_string(),
        None => "/".to_string(),
    }
}

/// Final path segment.
pub fn basename(path: &str) -> &str {
    if path == "/" {
        return "/";
    }
    match path.rfind('/') {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

fn now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

struct Store {
    entries: HashMap<String, Entry>,
    // directory path -> ordered child paths, insertion order preserved.
    children: HashMap<String, Vec<String>>,
}

impl Store {
    fn new() -> Self {
        let mut entries = HashMap::new();
        let t = now();
        entries.insert("/".to_string(), Entry::Directory { ctime: t, mtime: t });
        let mut children = HashMap::new();
        children.insert("/".to_string(), Vec::new());
        Store { entries, children }
    }

    fn link_child(&mut self, parent: &str, child: &str) {
        let list = self.children.entry(parent.to_string()).or_default();
        if !list.iter().any(|c| c == child) {
            list.push(child.to_string());
        }
    }

    fn unlink_child(&mut self, parent: &str, child: &str) {
        if let Some(list) = self.children.get_mut(parent) {
            list.retain(|c| c != child);
        }
    }

    fn mkdir_one(&mut self, path: &str) {
        let t = now();
        self.entries
            .insert(path.to_string(), Entry::Directory { ctime: t, mtime: t });
        self.children.entry(path.to_string()).or_default();
        let parent = dirname(path);
        self.link_child(&parent, path);
    }
}

/// The default, in-process VFS backend. Seeds a small set of well-known
/// directories on creation, mirroring a minimal POSIX tree.
pub struct InMemoryFs {
    store: RwLock<Store>,
}

impl InMemoryFs {
    pub fn new() -> Self {
        let mut store = Store::new();
        for dir in [
            "/home",
            "/tmp",
            "/usr",
            "/usr/bin",
            "/usr/share",
            "/usr/share/man",
            "/etc",
            "/mnt",
            "/proc",
        ] {
            if !store.entries.contains_key(dir) {
                ensure_dirs(&mut store, dir);
            }
        }
        InMemoryFs {
            store: RwLock::new(store),
        }
    }

    /// Build a store and pre-populate it with the given files (content
    /// keyed by absolute path), creating parent directories as needed.
    /// Used by tests and by callers who want a pre-seeded tree without
    /// going through write_file for every fixture.
    pub fn with_files(files: &[(&str, &str)]) -> Self {
        let fs = InMemoryFs::new();
        {
            let mut store = fs.store.blocking_write();
            for (path, content) in files {
                ensure_dirs(&mut store, &dirname(path));
                let parent = dirname(path);
                let t = now();
                store.entries.insert(
                    path.to_string(),
                    Entry::File { content: content.to_string(), ctime: t, mtime: t },
                );
                store.link_child(&parent, path);
            }
        }
        fs
    }
}

impl Default for InMemoryFs {
    fn default() -> Self {
        InMemoryFs::new()
    }
}

fn ensure_dirs(store: &mut Store, path: &str) {
    if path == "/" || store.entries.contains_key(path) {
        return;
    }
    ensure_dirs(store, &dirname(path));
    store.mkdir_one(path);
}

#[async_trait]
impl FileSystem for InMemoryFs {
    async fn read_file(&self, path: &str) -> Result<String, FsError> {
        let store = self.store.read().await;
        match store.entries.get(path) {
            None => Err(FsError::NotFound {
                path: path.to_string(),
                operation: "open".to_string(),
            }),
            Some(Entry::Directory { .. }) => Err(FsError::IsDirectory {
                path: path.to_string(),
                operation: "read".to_string(),
            }),
            Some(Entry::File { content, .. }) => Ok(content.clone()),
        }
    }

    async fn write_file(&self, path: &str, content: &str) -> Result<(), FsError> {
        let mut store = self.store.write().await;
        let parent = dirname(path);
        match store.entries.get(&parent) {
            None => {
                return Err(FsError::NotFound {
                    path: parent,
                    operation: "open".to_string(),
                })
            }
            Some(Entry::File { .. }) => {
                return Err(FsError::NotDirectory {
                    path: parent,
                    operation: "open".to_string(),
                })
            }
            Some(Entry::Directory { .. }) => {}
        }
        let ctime = match store.entries.get(path) {
            Some(Entry::Directory { .. }) => {
                return Err(FsError::IsDirectory {
                    path: path.to_string(),
                    operation: "open".to_string(),
                })
            }
            Some(Entry::File { ctime, .. }) => *ctime,
            None => now(),
        };
        store.entries.insert(
            path.to_string(),
            Entry::File { content: content.to_string(), ctime, mtime: now() },
        );
        store.link_child(&parent, path);
        Ok(())
    }

    async fn append_file(&self, path: &str, content: &str) -> Result<(), FsError> {
        let existing = match self.read_file(path).await {
            Ok(c) => c,
            Err(FsError::NotFound { .. }) => String::new(),
            Err(e) => return Err(e),
        };
        self.write_file(path, &format!("{}{}", existing, content)).await
    }

    async fn exists(&self, path: &str) -> bool {
        self.store.read().await.entries.contains_key(path)
    }

    async fn stat(&self, path: &str) -> Result<Stat, FsError> {
        let store = self.store.read().await;
        match store.entries.get(path) {
            None => Err(FsError::NotFound {
                path: path.to_string(),
                operation: "stat".to_string(),
            }),
            Some(Entry::Directory { ctime, mtime }) => Ok(Stat {
                kind: EntryKind::Directory,
                size: 0,
                ctime: *ctime,
                mtime: *mtime,
            }),
            Some(Entry::File { content, ctime, mtime }) => Ok(Stat {
                kind: EntryKind::File,
                size: content.len(),
                ctime: *ctime,
                mtime: *mtime,
            }),
        }
    }

    async fn mkdir(&self, path: &str, recursive: bool) -> Result<(), FsError> {
        let mut store = self.store.write().await;
        if store.entries.contains_key(path) {
            return Err(FsError::AlreadyExists {
                path: path.to_string(),
                operation: "mkdir".to_string(),
            });
        }
        if recursive {
            let mut to_create = Vec::new();
            let mut cur = path.to_string();
            loop {
                if cur == "/" || store.entries.contains_key(&cur) {
                    break;
                }
                to_create.push(cur.clone());
                cur = dirname(&cur);
            }
            to_create.reverse();
            for dir in to_create {
                store.mkdir_one(&dir);
            }
            Ok(())
        } else {
            let parent = dirname(path);
            match store.entries.get(&parent) {
                None => Err(FsError::NotFound {
                    path: parent,
                    operation: "mkdir".to_string(),
                }),
                Some(Entry::File { .. }) => Err(FsError::NotDirectory {
                    path: parent,
                    operation: "mkdir".to_string(),
                }),
                Some(Entry::Directory { .. }) => {
                    store.mkdir_one(path);
                    Ok(())
                }
            }
        }
    }

    async fn readdir(&self, path: &str) -> Result<Vec<DirEntry>, FsError> {
        let store = self.store.read().await;
        match store.entries.get(path) {
            None => {
                return Err(FsError::NotFound {
                    path: path.to_string(),
                    operation: "scandir".to_string(),
                })
            }
            Some(Entry::File { .. }) => {
                return Err(FsError::NotDirectory {
                    path: path.to_string(),
                    operation: "scandir".to_string(),
                })
            }
            Some(Entry::Directory { .. }) => {}
        }
        let children = store.children.get(path).cloned().unwrap_or_default();
        Ok(children
            .iter()
            .map(|child| {
                let kind = match store.entries.get(child) {
                    Some(Entry::Directory { .. }) => EntryKind::Directory,
                    _ => EntryKind::File,
                };
                DirEntry {
                    name: basename(child).to_string(),
                    kind,
                }
            })
            .collect())
    }

    async fn remove(&self, path: &str, options: RmOptions) -> Result<(), FsError> {
        if path == "/" {
            return Err(FsError::Other {
                message: "cannot remove root directory".to_string(),
            });
        }
        let mut store = self.store.write().await;
        match store.entries.get(path).cloned() {
            None => Err(FsError::NotFound {
                path: path.to_string(),
                operation: "unlink".to_string(),
            }),
            Some(Entry::File { .. }) => {
                store.entries.remove(path);
                store.children.remove(path);
                let parent = dirname(path);
                store.unlink_child(&parent, path);
                Ok(())
            }
            Some(Entry::Directory { .. }) => {
                let has_children = !store.children.get(path).map(|c| c.is_empty()).unwrap_or(true);
                if has_children && !options.recursive {
                    return Err(FsError::NotEmpty {
                        path: path.to_string(),
                        operation: "rmdir".to_string(),
                    });
                }
                if options.recursive {
                    remove_subtree(&mut store, path);
                } else {
                    store.entries.remove(path);
                    store.children.remove(path);
                }
                let parent = dirname(path);
                store.unlink_child(&parent, path);
                Ok(())
            }
        }
    }

    async fn copy_file(&self, src: &str, dst: &str) -> Result<(), FsError> {
        let content = match self.store.read().await.entries.get(src) {
            None => {
                return Err(FsError::NotFound {
                    path: src.to_string(),
                    operation: "copyFile".to_string(),
                })
            }
            Some(Entry::Directory { .. }) => {
                return Err(FsError::IsDirectory {
                    path: src.to_string(),
                    operation: "copyFile".to_string(),
                })
            }
            Some(Entry::File { content, .. }) => content.clone(),
        };
        self.write_file(dst, &content).await
    }

    async fn rename(&self, src: &str, dst: &str) -> Result<(), FsError> {
        let mut store = self.store.write().await;
        let entry = match store.entries.get(src).cloned() {
            None => {
                return Err(FsError::NotFound {
                    path: src.to_string(),
                    operation: "rename".to_string(),
                })
            }
            Some(e) => e,
        };
        let dst_parent = dirname(dst);
        match store.entries.get(&dst_parent) {
            None => {
                return Err(FsError::NotFound {
                    path: dst_parent,
                    operation: "rename".to_string(),
                })
            }
            Some(Entry::File { .. }) => {
                return Err(FsError::NotDirectory {
                    path: dst_parent,
                    operation: "rename".to_string(),
                })
            }
            Some(Entry::Directory { .. }) => {}
        }
        if let Some(Entry::Directory { .. }) = store.entries.get(dst) {
            let non_empty = !store.children.get(dst).map(|c| c.is_empty()).unwrap_or(true);
            if non_empty {
                return Err(FsError::NotEmpty {
                    path: dst.to_string(),
                    operation: "rename".to_string(),
                });
            }
        }

        let is_dir = entry.is_directory();
        let prefix = format!("{}/", src);
        let moved: Vec<String> = if is_dir {
            store
                .entries
                .keys()
                .filter(|k| k.starts_with(&prefix))
                .cloned()
                .collect()
        } else {
            Vec::new()
        };

        // remove old entry and old parent linkage
        store.entries.remove(src);
        let src_parent = dirname(src);
        store.unlink_child(&src_parent, src);
        if let Some(old_children) = store.children.remove(src) {
            store.children.insert(dst.to_string(), old_children);
        }
        store.entries.insert(dst.to_string(), entry);
        store.link_child(&dst_parent, dst);

        for old_path in moved {
            if let Some(e) = store.entries.remove(&old_path) {
                let suffix = &old_path[prefix.len()..];
                let new_path = format!("{}/{}", dst, suffix);
                if let Some(kids) = store.children.remove(&old_path) {
                    store.children.insert(new_path.clone(), kids);
                }
                store.entries.insert(new_path, e);
            }
        }
        // fix up children lists for moved directories (old_path keys inside children maps)
        let keys: Vec<String> = store.children.keys().cloned().collect();
        for key in keys {
            if let Some(list) = store.children.remove(&key) {
                let new_list = list
                    .into_iter()
                    .map(|c| {
                        if c.starts_with(&prefix) {
                            format!("{}/{}", dst, &c[prefix.len()..])
                        } else if c == src {
                            dst.to_string()
                        } else {
                            c
                        }
                    })
                    .collect();
                let new_key = if key.starts_with(&prefix) {
                    format!("{}/{}", dst, &key[prefix.len()..])
                } else {
                    key
                };
                store.children.insert(new_key, new_list);
            }
        }
        Ok(())
    }
}

fn remove_subtree(store: &mut Store, path: &str) {
    let children = store.children.remove(path).unwrap_or_default();
    for child in children {
        remove_subtree(store, &child);
    }
    store.entries.remove(path);
}
