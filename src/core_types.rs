//! Defines core data structures shared by the enumeration strategies and the
//! downloader.
//!
//! `TreeEntry` and `DirectoryListingEntry` mirror the two GitHub listing
//! payloads; `DownloadTask` is what both strategies produce and what the blob
//! downloader consumes.

use serde::Deserialize;
use std::path::{Component, Path, PathBuf};

/// The kind of a node in a recursive git tree listing.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TreeEntryKind {
    /// A file.
    Blob,
    /// A directory.
    Tree,
    /// Anything else, e.g. a submodule (`commit`).
    #[serde(other)]
    Other,
}

/// One node from the recursive tree listing (`git/trees/{branch}?recursive=1`).
///
/// # Examples
///
/// ```
/// use repo_harvester::core_types::{TreeEntry, TreeEntryKind};
///
/// let entry: TreeEntry =
///     serde_json::from_str(r#"{"path": "src/main.c", "type": "blob", "sha": "abc"}"#).unwrap();
/// assert_eq!(entry.kind, TreeEntryKind::Blob);
/// assert!(entry.matches(".c"));
/// ```
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    /// Path relative to the repository root.
    pub path: String,
    /// Node kind.
    #[serde(rename = "type")]
    pub kind: TreeEntryKind,
}

impl TreeEntry {
    /// Returns `true` if this entry is a blob whose path ends with `extension`.
    pub fn matches(&self, extension: &str) -> bool {
        self.kind == TreeEntryKind::Blob && self.path.ends_with(extension)
    }
}

/// The kind of an item returned by the contents API.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ListingKind {
    File,
    Dir,
    /// Symlinks and submodules are never followed.
    #[serde(other)]
    Other,
}

/// One item from a per-directory contents listing.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DirectoryListingEntry {
    /// Path relative to the repository root.
    pub path: String,
    /// Base name of the item.
    pub name: String,
    /// Item kind.
    #[serde(rename = "type")]
    pub kind: ListingKind,
}

/// A single file to fetch from a repository.
///
/// The local target is `destination_root.join(path)`, so every task maps to
/// exactly one local file and that mapping is the same on every run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTask {
    pub owner: String,
    pub name: String,
    pub branch: String,
    /// Path of the file relative to the repository root, `/`-separated.
    pub path: String,
    /// The repository's local directory.
    pub destination_root: PathBuf,
}

impl DownloadTask {
    /// Computes the local file path for this task.
    ///
    /// Returns `None` if the remote path is absolute or escapes the
    /// destination root (`..`), in which case the task must be skipped.
    ///
    /// # Examples
    ///
    /// ```
    /// use repo_harvester::core_types::DownloadTask;
    /// use std::path::PathBuf;
    ///
    /// let task = DownloadTask {
    ///     owner: "madler".to_string(),
    ///     name: "zlib".to_string(),
    ///     branch: "develop".to_string(),
    ///     path: "contrib/minizip/zip.c".to_string(),
    ///     destination_root: PathBuf::from("projects/zlib"),
    /// };
    /// assert_eq!(
    ///     task.local_path(),
    ///     Some(PathBuf::from("projects/zlib/contrib/minizip/zip.c"))
    /// );
    /// ```
    pub fn local_path(&self) -> Option<PathBuf> {
        let relative = Path::new(&self.path);
        if self.path.is_empty()
            || !relative
                .components()
                .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return None;
        }
        Some(self.destination_root.join(relative))
    }
}
