//! Deterministic in-memory [`FileSystem`] used by unit tests.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;

use anyhow::{Result, bail};

use super::{FileSystem, WalkEntry, WalkOptions};

/// An in-memory tree built from (path, size) pairs.
///
/// Directories are derived from file paths; empty directories and directory
/// own-sizes can be added explicitly. Walk options are accepted but not
/// interpreted, since hidden/tracked filtering is a backend concern.
#[derive(Debug, Default)]
pub(crate) struct MemFileSystem {
    /// File path to apparent size; `None` models an unknown size.
    files: BTreeMap<String, Option<u64>>,

    /// All directory paths, including derived ancestors.
    dirs: BTreeSet<String>,

    /// Explicit own-sizes for directories.
    dir_sizes: HashMap<String, u64>,
}

impl MemFileSystem {
    pub(crate) fn new(files: &[(&str, u64)]) -> Self {
        let mut fs = Self::default();
        for (path, size) in files {
            fs.files.insert((*path).to_string(), Some(*size));
            fs.add_ancestors(path);
        }
        fs
    }

    /// Add a directory (and its ancestors) without any contents.
    pub(crate) fn with_dir(mut self, dir: &str) -> Self {
        self.dirs.insert(dir.to_string());
        self.add_ancestors(dir);
        self
    }

    /// Give a directory an own apparent size.
    pub(crate) fn with_dir_size(mut self, dir: &str, size: u64) -> Self {
        self.dir_sizes.insert(dir.to_string(), size);
        self
    }

    /// Make a file's size lookup return `None`.
    pub(crate) fn with_unknown_size(mut self, path: &str) -> Self {
        self.files.insert(path.to_string(), None);
        self
    }

    fn add_ancestors(&mut self, path: &str) {
        let mut current = path;
        while let Some(parent) = parent_of(current) {
            self.dirs.insert(parent.to_string());
            current = parent;
        }
    }
}

/// Parent of a slash-separated path, or `None` at the top.
fn parent_of(path: &str) -> Option<&str> {
    match path.rsplit_once('/') {
        Some((parent, _)) if !parent.is_empty() => Some(parent),
        _ => None,
    }
}

impl FileSystem for MemFileSystem {
    fn walk(&self, root: &str, _options: &WalkOptions) -> Result<Vec<WalkEntry>> {
        if !self.dirs.contains(root) {
            bail!("cannot access '{root}'");
        }

        // BTreeSet iteration is lexicographic, and a parent directory is a
        // strict prefix of its children, so this order is already top-down.
        let entries = self
            .dirs
            .iter()
            .filter(|dir| *dir == root || dir.starts_with(&format!("{root}/")))
            .map(|dir| WalkEntry {
                dir: dir.clone(),
                subdirs: children_of(dir, &self.dirs),
                files: children_of(dir, self.files.keys()),
            })
            .collect();

        Ok(entries)
    }

    fn size(&self, path: &str) -> Option<u64> {
        if let Some(size) = self.files.get(path) {
            return *size;
        }
        self.dir_sizes.get(path).copied()
    }

    fn normalize(&self, os_path: &Path) -> String {
        os_path.to_string_lossy().into_owned()
    }
}

/// Names of the immediate children of `dir` among `candidates`.
fn children_of<'a>(dir: &str, candidates: impl IntoIterator<Item = &'a String>) -> Vec<String> {
    candidates
        .into_iter()
        .filter_map(|path| {
            let (parent, name) = path.rsplit_once('/')?;
            (parent == dir).then(|| name.to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walk_is_top_down_and_grouped() {
        let fs = MemFileSystem::new(&[("./a/f1", 10), ("./a/b/f2", 20), ("./g", 30)]);
        let entries = fs.walk(".", &WalkOptions::default()).unwrap();

        assert_eq!(entries[0].dir, ".");
        assert_eq!(entries[0].subdirs, vec!["a"]);
        assert_eq!(entries[0].files, vec!["g"]);
        assert_eq!(entries[1].dir, "./a");
        assert_eq!(entries[1].subdirs, vec!["b"]);
        assert_eq!(entries[1].files, vec!["f1"]);
        assert_eq!(entries[2].dir, "./a/b");
        assert_eq!(entries[2].files, vec!["f2"]);
    }

    #[test]
    fn test_walk_of_subtree() {
        let fs = MemFileSystem::new(&[("./a/f1", 10), ("./a/b/f2", 20), ("./g", 30)]);
        let entries = fs.walk("./a", &WalkOptions::default()).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].dir, "./a");
    }

    #[test]
    fn test_size_lookups() {
        let fs = MemFileSystem::new(&[("./a/f1", 10)])
            .with_dir_size("./a", 4096)
            .with_unknown_size("./a/f1");

        assert_eq!(fs.size("./a/f1"), None);
        assert_eq!(fs.size("./a"), Some(4096));
        assert_eq!(fs.size("."), None);
        assert_eq!(fs.size("./missing"), None);
    }
}
