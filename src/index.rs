//! Filesystem index over the download root
//!
//! Nothing is cached: every call walks the directory tree again, so the
//! listing always reflects what is on disk.

use crate::error::{Error, Result};
use crate::types::{EntryKind, FolderContents, FolderFile, IndexEntry};
use crate::utils::{file_url, is_mp4, is_thumbnail, safe_relative_path, title_from_file_name};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Read and maintenance operations over one download root
#[derive(Clone, Debug)]
pub struct DownloadIndex {
    root: PathBuf,
}

impl DownloadIndex {
    /// Index over `root`; the directory does not need to exist yet
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The download root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Describe every immediate child of the root, sorted by name
    ///
    /// Folders report their `.mp4` count, first thumbnail image and a title
    /// taken from the first `.mp4`. Loose files report their size. A missing
    /// root lists as empty.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the root or one of its folders cannot be read.
    pub async fn list(&self) -> Result<Vec<IndexEntry>> {
        let children = match sorted_children(&self.root).await {
            Ok(children) => children,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut items = Vec::with_capacity(children.len());
        for (name, path) in children {
            let metadata = match tokio::fs::metadata(&path).await {
                Ok(metadata) => metadata,
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "skipping unreadable entry");
                    continue;
                }
            };

            if metadata.is_dir() {
                items.push(describe_folder(&name, &path).await?);
            } else if metadata.is_file() {
                items.push(IndexEntry {
                    title: title_from_file_name(&name),
                    name,
                    kind: EntryKind::File,
                    file_count: None,
                    size: Some(metadata.len()),
                    thumbnail: None,
                });
            }
        }

        Ok(items)
    }

    /// Map a client-supplied relative path to an existing file under the root
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for traversal attempts, absolute or empty
    /// paths, paths leaving the root through symlinks, and anything that is
    /// not an existing regular file.
    pub async fn resolve_file(&self, relative: &str) -> Result<PathBuf> {
        let not_found = || Error::NotFound(relative.to_string());

        let clean = safe_relative_path(relative).ok_or_else(not_found)?;
        let candidate = self.root.join(clean);

        let (Ok(resolved), Ok(root)) = (
            tokio::fs::canonicalize(&candidate).await,
            tokio::fs::canonicalize(&self.root).await,
        ) else {
            return Err(not_found());
        };
        if !resolved.starts_with(&root) {
            warn!(requested = relative, "rejected path outside the download root");
            return Err(not_found());
        }

        match tokio::fs::metadata(&resolved).await {
            Ok(metadata) if metadata.is_file() => Ok(resolved),
            _ => Err(not_found()),
        }
    }

    /// Classify the `.mp4` files in one session folder
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if `name` is not a single path component
    /// naming a folder under the root, or [`Error::Io`] if it cannot be read.
    /// Videos that resolve outside the root through symlinks are skipped.
    pub async fn folder_contents(&self, name: &str) -> Result<FolderContents> {
        let clean = safe_relative_path(name)
            .filter(|p| p.components().count() == 1)
            .ok_or_else(|| Error::NotFound(name.to_string()))?;
        let (Ok(folder), Ok(root)) = (
            tokio::fs::canonicalize(self.root.join(&clean)).await,
            tokio::fs::canonicalize(&self.root).await,
        ) else {
            return Err(Error::NotFound(name.to_string()));
        };
        if !folder.starts_with(&root) {
            warn!(requested = name, "rejected folder outside the download root");
            return Err(Error::NotFound(name.to_string()));
        }
        match tokio::fs::metadata(&folder).await {
            Ok(metadata) if metadata.is_dir() => {}
            _ => return Err(Error::NotFound(name.to_string())),
        }

        let mut videos = Vec::new();
        for (file, path) in sorted_children(&folder).await? {
            if !is_mp4(&file) {
                continue;
            }
            let Ok(resolved) = tokio::fs::canonicalize(&path).await else {
                continue;
            };
            if !resolved.starts_with(&root) {
                warn!(folder = name, file = %file, "skipping video linked outside the download root");
                continue;
            }
            if tokio::fs::metadata(&resolved).await.is_ok_and(|m| m.is_file()) {
                videos.push((file, resolved));
            }
        }

        let folder_name = clean.to_string_lossy();
        Ok(match videos.len() {
            0 => FolderContents::Empty,
            1 => {
                let (_, path) = videos.remove(0);
                FolderContents::Single(path)
            }
            _ => FolderContents::Multiple(
                videos
                    .into_iter()
                    .map(|(file, _)| FolderFile {
                        url: file_url(&[folder_name.as_ref(), file.as_str()]),
                        name: file,
                    })
                    .collect(),
            ),
        })
    }

    /// Delete everything under the root and recreate it empty
    ///
    /// Entries that resist deletion are made writable and retried. The root
    /// is recreated even when some entries survive.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PartialClear`] if entries remain after the retry, or
    /// [`Error::Io`] if the root cannot be recreated.
    pub async fn clear(&self) -> Result<()> {
        let root = self.root.clone();
        let survivors = tokio::task::spawn_blocking(move || remove_tree(&root))
            .await
            .map_err(|e| Error::Other(format!("clear task failed: {e}")))?;

        tokio::fs::create_dir_all(&self.root).await?;

        if survivors > 0 {
            warn!(root = %self.root.display(), survivors, "download root only partially cleared");
            return Err(Error::PartialClear {
                root: self.root.clone(),
                failed: survivors,
            });
        }

        info!(root = %self.root.display(), "cleared download root");
        Ok(())
    }
}

/// Children of `dir` as `(name, path)`, sorted by name
async fn sorted_children(dir: &Path) -> std::io::Result<Vec<(String, PathBuf)>> {
    let mut children = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        children.push((entry.file_name().to_string_lossy().into_owned(), entry.path()));
    }
    children.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(children)
}

async fn describe_folder(name: &str, path: &Path) -> Result<IndexEntry> {
    let mut mp4_count = 0;
    let mut first_mp4: Option<String> = None;
    let mut thumbnail: Option<String> = None;

    for (file, _) in sorted_children(path).await? {
        if is_mp4(&file) {
            mp4_count += 1;
            if first_mp4.is_none() {
                first_mp4 = Some(file);
            }
        } else if thumbnail.is_none() && is_thumbnail(&file) {
            thumbnail = Some(file_url(&[name, file.as_str()]));
        }
    }

    Ok(IndexEntry {
        name: name.to_string(),
        kind: EntryKind::Folder,
        file_count: Some(mp4_count),
        size: None,
        thumbnail,
        title: first_mp4
            .map(|file| title_from_file_name(&file))
            .unwrap_or_else(|| name.to_string()),
    })
}

/// Remove `root` recursively, returning how many top-level entries survived
fn remove_tree(root: &Path) -> usize {
    if !root.exists() {
        return 0;
    }
    if std::fs::remove_dir_all(root).is_ok() {
        return 0;
    }

    debug!(root = %root.display(), "retrying removal after clearing read-only bits");
    make_writable(root);
    if let Err(e) = std::fs::remove_dir_all(root) {
        warn!(root = %root.display(), error = %e, "failed to remove download root");
    }

    if !root.exists() {
        return 0;
    }
    std::fs::read_dir(root)
        .map(|entries| entries.count())
        .unwrap_or(1)
}

/// Clear read-only bits on `path` and everything below it
fn make_writable(path: &Path) {
    let Ok(metadata) = std::fs::symlink_metadata(path) else {
        return;
    };
    if metadata.file_type().is_symlink() {
        return;
    }

    set_writable(path, metadata.permissions());

    if metadata.is_dir() {
        if let Ok(entries) = std::fs::read_dir(path) {
            for entry in entries.flatten() {
                make_writable(&entry.path());
            }
        }
    }
}

#[cfg(unix)]
fn set_writable(path: &Path, mut permissions: std::fs::Permissions) {
    use std::os::unix::fs::PermissionsExt;

    permissions.set_mode(permissions.mode() | 0o700);
    if let Err(e) = std::fs::set_permissions(path, permissions) {
        debug!(path = %path.display(), error = %e, "could not make writable");
    }
}

#[cfg(not(unix))]
#[allow(clippy::permissions_set_readonly_false)]
fn set_writable(path: &Path, mut permissions: std::fs::Permissions) {
    permissions.set_readonly(false);
    if let Err(e) = std::fs::set_permissions(path, permissions) {
        debug!(path = %path.display(), error = %e, "could not make writable");
    }
}
