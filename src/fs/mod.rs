pub mod error;
pub mod memory;
pub mod types;

pub use error::FsError;
pub use memory::{basename, dirname, resolve_path, InMemoryFs};
pub use types::{DirEntry, Entry, EntryKind, FileSystem, RmOptions, Stat};

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn seeds_well_known_dirs_once() {
        let fs = InMemoryFs::new();
        assert!(fs.exists("/home").await);
        assert!(fs.exists("/tmp").await);
        let before = fs.readdir("/").await.unwrap().len();
        // re-seeding the same backing store must not duplicate entries
        let fs2 = InMemoryFs::new();
        let after = fs2.readdir("/").await.unwrap().len();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn write_then_read_roundtrip() {
        let fs = InMemoryFs::new();
        fs.write_file("/tmp/a.txt", "hello").await.unwrap();
        assert_eq!(fs.read_file("/tmp/a.txt").await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn write_missing_parent_is_enoent() {
        let fs = InMemoryFs::new();
        let err = fs.write_file("/no/such/dir/a.txt", "x").await.unwrap_err();
        assert_eq!(err.kind_str(), "ENOENT");
    }

    #[tokio::test]
    async fn write_over_directory_is_eisdir() {
        let fs = InMemoryFs::new();
        let err = fs.write_file("/tmp", "x").await.unwrap_err();
        assert_eq!(err.kind_str(), "EISDIR");
    }

    #[tokio::test]
    async fn mkdir_existing_is_eexist() {
        let fs = InMemoryFs::new();
        let err = fs.mkdir("/tmp", false).await.unwrap_err();
        assert_eq!(err.kind_str(), "EEXIST");
    }

    #[tokio::test]
    async fn mkdir_without_parent_is_enoent() {
        let fs = InMemoryFs::new();
        let err = fs.mkdir("/a/b", false).await.unwrap_err();
        assert_eq!(err.kind_str(), "ENOENT");
    }

    #[tokio::test]
    async fn mkdir_recursive_creates_all_ancestors() {
        let fs = InMemoryFs::new();
        fs.mkdir("/a/b/c", true).await.unwrap();
        assert!(fs.exists("/a").await);
        assert!(fs.exists("/a/b").await);
        assert!(fs.exists("/a/b/c").await);
    }

    #[tokio::test]
    async fn remove_nonempty_dir_is_enotempty() {
        let fs = InMemoryFs::new();
        fs.mkdir("/a", false).await.unwrap();
        fs.write_file("/a/f", "x").await.unwrap();
        let err = fs
            .remove("/a", RmOptions { recursive: false })
            .await
            .unwrap_err();
        assert_eq!(err.kind_str(), "ENOTEMPTY");
    }

    #[tokio::test]
    async fn remove_recursive_removes_subtree() {
        let fs = InMemoryFs::new();
        fs.mkdir("/a", false).await.unwrap();
        fs.write_file("/a/f", "x").await.unwrap();
        fs.remove("/a", RmOptions { recursive: true }).await.unwrap();
        assert!(!fs.exists("/a").await);
        assert!(!fs.exists("/a/f").await);
    }

    #[tokio::test]
    async fn readdir_preserves_insertion_order() {
        let fs = InMemoryFs::new();
        fs.write_file("/tmp/z.txt", "1").await.unwrap();
        fs.write_file("/tmp/a.txt", "2").await.unwrap();
        fs.write_file("/tmp/m.txt", "3").await.unwrap();
        let names: Vec<String> = fs
            .readdir("/tmp")
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["z.txt", "a.txt", "m.txt"]);
    }

    #[tokio::test]
    async fn rename_moves_directory_subtree() {
        let fs = InMemoryFs::new();
        fs.mkdir("/a", false).await.unwrap();
        fs.write_file("/a/f.txt", "x").await.unwrap();
        fs.rename("/a", "/b").await.unwrap();
        assert!(!fs.exists("/a").await);
        assert!(fs.exists("/b").await);
        assert_eq!(fs.read_file("/b/f.txt").await.unwrap(), "x");
    }

    #[tokio::test]
    async fn overwrite_preserves_ctime_but_bumps_mtime() {
        let fs = InMemoryFs::new();
        fs.write_file("/tmp/a.txt", "v1").await.unwrap();
        let created = fs.stat("/tmp/a.txt").await.unwrap();
        fs.write_file("/tmp/a.txt", "v2").await.unwrap();
        let updated = fs.stat("/tmp/a.txt").await.unwrap();
        assert_eq!(created.ctime, updated.ctime);
        assert_eq!(updated.size, 2);
    }

    #[tokio::test]
    async fn resolve_path_collapses_dotdot() {
        let fs = InMemoryFs::new();
        assert_eq!(fs.resolve("/home/user", "../tmp"), "/home/tmp");
        assert_eq!(fs.resolve("/home/user", "/etc"), "/etc");
        assert_eq!(fs.resolve("/", "."), "/");
    }
}
