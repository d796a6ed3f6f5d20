//! Per-request work directories.
//!
//! Every render gets its own `manim_<uuid>` directory under a configured
//! work root. The renderer writes the script and its whole media tree
//! there; the directory is removed once the artifact has been uploaded.

use std::collections::VecDeque;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tokio::fs;
use uuid::Uuid;

use crate::types::Timestamp;

/// Prefix of every per-request directory.
pub const WORK_DIR_PREFIX: &str = "manim_";

/// A regular file found under the work root.
#[derive(Debug, Clone, Serialize)]
pub struct FileEntry {
    pub name: String,
    pub path: String,
    pub size: u64,
    pub modified: Option<Timestamp>,
}

/// Create a fresh, uniquely named directory under `root`.
///
/// `root` itself is created if it does not exist yet.
pub async fn create_work_dir(root: &Path) -> io::Result<PathBuf> {
    let dir = root.join(format!("{WORK_DIR_PREFIX}{}", Uuid::new_v4().simple()));
    fs::create_dir_all(&dir).await?;
    Ok(dir)
}

/// Remove a work directory and everything below it.
///
/// A directory that is already gone counts as removed.
pub async fn remove_work_dir(dir: &Path) -> io::Result<()> {
    match fs::remove_dir_all(dir).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

/// Search the tree under `dir` for a file whose name ends with
/// `extension` and contains `stem`. Returns the first match.
pub async fn find_artifact(dir: &Path, stem: &str, extension: &str) -> io::Result<Option<PathBuf>> {
    let mut pending = VecDeque::from([dir.to_path_buf()]);

    while let Some(current) = pending.pop_front() {
        let mut entries = fs::read_dir(&current).await?;
        while let Some(entry) = entries.next_entry().await? {
            let file_type = entry.file_type().await?;
            if file_type.is_dir() {
                pending.push_back(entry.path());
                continue;
            }

            let name = entry.file_name();
            let name = name.to_string_lossy();
            if file_type.is_file() && name.ends_with(extension) && name.contains(stem) {
                return Ok(Some(entry.path()));
            }
        }
    }

    Ok(None)
}

/// List every regular file below `root`, sorted by path.
///
/// A missing root yields an empty list.
pub async fn list_files(root: &Path) -> io::Result<Vec<FileEntry>> {
    let mut files = Vec::new();
    let mut pending = VecDeque::from([root.to_path_buf()]);

    while let Some(current) = pending.pop_front() {
        let mut entries = match fs::read_dir(&current).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(e) => return Err(e),
        };

        while let Some(entry) = entries.next_entry().await? {
            let metadata = entry.metadata().await?;
            if metadata.is_dir() {
                pending.push_back(entry.path());
            } else if metadata.is_file() {
                files.push(FileEntry {
                    name: entry.file_name().to_string_lossy().into_owned(),
                    path: entry.path().to_string_lossy().into_owned(),
                    size: metadata.len(),
                    modified: metadata.modified().ok().map(Timestamp::from),
                });
            }
        }
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_work_dir_makes_unique_dirs() {
        let root = tempfile::tempdir().expect("tempdir");
        let a = create_work_dir(root.path()).await.expect("create a");
        let b = create_work_dir(root.path()).await.expect("create b");

        assert_ne!(a, b);
        assert!(a.is_dir());
        assert!(b.is_dir());
        let name = a.file_name().expect("name").to_string_lossy().into_owned();
        assert!(name.starts_with(WORK_DIR_PREFIX));
    }

    #[tokio::test]
    async fn create_work_dir_creates_missing_root() {
        let root = tempfile::tempdir().expect("tempdir");
        let nested = root.path().join("does/not/exist");
        let dir = create_work_dir(&nested).await.expect("create");
        assert!(dir.starts_with(&nested));
        assert!(dir.is_dir());
    }

    #[tokio::test]
    async fn remove_work_dir_deletes_tree_and_tolerates_missing() {
        let root = tempfile::tempdir().expect("tempdir");
        let dir = create_work_dir(root.path()).await.expect("create");
        fs::create_dir_all(dir.join("media/videos")).await.expect("mkdir");
        fs::write(dir.join("media/videos/a.mp4"), b"x").await.expect("write");

        remove_work_dir(&dir).await.expect("remove");
        assert!(!dir.exists());

        remove_work_dir(&dir).await.expect("second remove is a no-op");
    }

    #[tokio::test]
    async fn find_artifact_searches_nested_dirs() {
        let root = tempfile::tempdir().expect("tempdir");
        let nested = root.path().join("media/videos/clip/480p15");
        fs::create_dir_all(&nested).await.expect("mkdir");
        fs::write(nested.join("clip_1234.mp4"), b"video").await.expect("write");
        fs::write(root.path().join("clip_1234.py"), b"script").await.expect("write");

        let found = find_artifact(root.path(), "clip_1234", ".mp4")
            .await
            .expect("search");
        assert_eq!(found, Some(nested.join("clip_1234.mp4")));
    }

    #[tokio::test]
    async fn find_artifact_ignores_other_stems_and_extensions() {
        let root = tempfile::tempdir().expect("tempdir");
        fs::write(root.path().join("other_9999.mp4"), b"video").await.expect("write");
        fs::write(root.path().join("clip_1234.py"), b"script").await.expect("write");

        let found = find_artifact(root.path(), "clip_1234", ".mp4")
            .await
            .expect("search");
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn list_files_reports_sizes() {
        let root = tempfile::tempdir().expect("tempdir");
        fs::create_dir_all(root.path().join("sub")).await.expect("mkdir");
        fs::write(root.path().join("a.py"), b"abc").await.expect("write");
        fs::write(root.path().join("sub/b.mp4"), b"12345").await.expect("write");

        let files = list_files(root.path()).await.expect("list");
        assert_eq!(files.len(), 2);

        let a = files.iter().find(|f| f.name == "a.py").expect("a.py");
        assert_eq!(a.size, 3);
        assert!(a.modified.is_some());
        let b = files.iter().find(|f| f.name == "b.mp4").expect("b.mp4");
        assert_eq!(b.size, 5);
        assert!(b.path.ends_with("sub/b.mp4"));
    }

    #[tokio::test]
    async fn list_files_on_missing_root_is_empty() {
        let root = tempfile::tempdir().expect("tempdir");
        let files = list_files(&root.path().join("gone")).await.expect("list");
        assert!(files.is_empty());
    }
}
