//! File system abstraction consumed by the disk-usage core.
//!
//! The aggregation logic never touches the operating system directly; it
//! talks to a [`FileSystem`] that can walk a tree top-down, report apparent
//! sizes, and normalize OS paths into the internal slash-separated form.
//! The production implementation is [`OsFileSystem`]; unit tests use a
//! deterministic in-memory implementation.

use std::path::Path;

use anyhow::Result;

pub mod os;

#[cfg(test)]
pub(crate) mod mem;

pub use os::OsFileSystem;

/// One directory visited during a walk: its path plus the names of its
/// immediate subdirectories and files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry {
    /// Normalized path of the directory, relative to the query root.
    pub dir: String,

    /// Names (not paths) of the immediate subdirectories, sorted.
    pub subdirs: Vec<String>,

    /// Names (not paths) of the immediate files, sorted.
    pub files: Vec<String>,
}

/// Options controlling which entries a walk emits.
#[derive(Debug, Clone, Copy)]
pub struct WalkOptions {
    /// Include hidden files and directories (dotfiles).
    pub include_hidden: bool,

    /// Restrict the walk to tracked entries, i.e. entries not excluded by
    /// ignore rules (`.gitignore`, `.ignore`).
    pub tracked_only: bool,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            include_hidden: true,
            tracked_only: false,
        }
    }
}

/// Read-only view of a hierarchical tree of files and directories.
///
/// Implementations must visit every directory exactly once per walk and
/// emit entries in top-down order: a directory always appears before any of
/// its subdirectories. The aggregator relies on this to process the reversed
/// sequence bottom-up.
pub trait FileSystem {
    /// Walk the tree rooted at `root` (a normalized path) top-down.
    ///
    /// # Errors
    ///
    /// Fails when the root does not exist or is not a directory. Individual
    /// unreadable entries below the root are skipped, not fatal.
    fn walk(&self, root: &str, options: &WalkOptions) -> Result<Vec<WalkEntry>>;

    /// Apparent byte size of the entry at `path`, or `None` when unknown
    /// (missing entries, directories without an own size).
    fn size(&self, path: &str) -> Option<u64>;

    /// Convert an OS path into the internal slash-separated form.
    fn normalize(&self, os_path: &Path) -> String;
}

/// Join a normalized directory path and a child name.
///
/// # Examples
///
/// ```
/// # use repo_du::fs::join_path;
/// assert_eq!(join_path(".", "data_dir"), "./data_dir");
/// assert_eq!(join_path("./data_dir", "data"), "./data_dir/data");
/// assert_eq!(join_path("/", "tmp"), "/tmp");
/// ```
#[must_use]
pub fn join_path(dir: &str, name: &str) -> String {
    if dir == "/" {
        format!("/{name}")
    } else {
        format!("{dir}/{name}")
    }
}
