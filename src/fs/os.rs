//! Operating-system backed [`FileSystem`] implementation.
//!
//! The default walk uses [walkdir](https://docs.rs/walkdir/); the
//! tracked-only walk uses the [ignore](https://docs.rs/ignore/) crate so
//! that "tracked" means "not excluded by `.gitignore`/`.ignore` rules".
//! Both walks group entries per directory and emit them top-down, children
//! sorted by name for deterministic output.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result, bail};
use colored::Colorize;
use walkdir::WalkDir;

use super::{FileSystem, WalkEntry, WalkOptions, join_path};

/// [`FileSystem`] backed by the local operating system.
///
/// Sizes are apparent sizes (`metadata.len()`) and are only reported for
/// regular files; directories have no own apparent size on this backend.
/// Unreadable entries below the root are skipped, optionally with a warning
/// on stderr in verbose mode.
#[derive(Debug, Default)]
pub struct OsFileSystem {
    /// Report skipped/unreadable entries to stderr.
    verbose: bool,
}

impl OsFileSystem {
    /// Create a file system view with default settings.
    #[must_use]
    pub const fn new() -> Self {
        Self { verbose: false }
    }

    /// Enable or disable reporting of skipped entries to stderr.
    #[must_use]
    pub const fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Report a walk error in verbose mode, otherwise swallow it.
    fn report(&self, err: &dyn std::fmt::Display) {
        if self.verbose {
            eprintln!("{}", format!("Warning: {err}").red());
        }
    }

    /// Walk with `walkdir`, optionally excluding hidden entries.
    fn walk_all(&self, root: &str, include_hidden: bool) -> Vec<WalkEntry> {
        let mut collector = WalkCollector::new(root);

        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| {
                include_hidden || entry.depth() == 0 || !is_hidden_name(entry.file_name())
            });

        for entry in walker {
            match entry {
                Ok(entry) => {
                    collector.record(entry.path(), entry.depth(), entry.file_type().is_dir());
                }
                Err(err) => self.report(&err),
            }
        }

        collector.into_entries()
    }

    /// Walk with the `ignore` crate, honoring `.gitignore`/`.ignore` rules.
    fn walk_tracked(&self, root: &str, include_hidden: bool) -> Vec<WalkEntry> {
        let mut collector = WalkCollector::new(root);

        let mut builder = ignore::WalkBuilder::new(root);
        builder
            .hidden(!include_hidden)
            .require_git(false)
            .sort_by_file_name(|a, b| a.cmp(b));

        for entry in builder.build() {
            match entry {
                Ok(entry) => {
                    let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
                    collector.record(entry.path(), entry.depth(), is_dir);
                }
                Err(err) => self.report(&err),
            }
        }

        collector.into_entries()
    }
}

impl FileSystem for OsFileSystem {
    fn walk(&self, root: &str, options: &WalkOptions) -> Result<Vec<WalkEntry>> {
        let metadata = std::fs::metadata(Path::new(root))
            .with_context(|| format!("cannot access '{root}'"))?;
        if !metadata.is_dir() {
            bail!("'{root}' is not a directory");
        }

        let entries = if options.tracked_only {
            self.walk_tracked(root, options.include_hidden)
        } else {
            self.walk_all(root, options.include_hidden)
        };

        Ok(entries)
    }

    fn size(&self, path: &str) -> Option<u64> {
        let metadata = std::fs::metadata(Path::new(path)).ok()?;
        metadata.is_file().then_some(metadata.len())
    }

    fn normalize(&self, os_path: &Path) -> String {
        let mut parts: Vec<String> = Vec::new();

        for component in os_path.components() {
            match component {
                Component::CurDir => {}
                Component::RootDir => parts.push(String::new()),
                other => parts.push(other.as_os_str().to_string_lossy().into_owned()),
            }
        }

        if parts.is_empty() {
            ".".to_string()
        } else if parts.len() == 1 && parts[0].is_empty() {
            "/".to_string()
        } else {
            parts.join("/")
        }
    }
}

/// Whether a file name denotes a hidden entry (dotfile).
fn is_hidden_name(name: &std::ffi::OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

/// Groups a flat pre-order stream of entries into per-directory
/// [`WalkEntry`] triples, translating OS paths into internal paths.
struct WalkCollector {
    /// Internal path of the walk root.
    root: String,

    /// Entries in the order their directories were first seen (top-down).
    entries: Vec<WalkEntry>,

    /// OS directory path to index into `entries`.
    index: HashMap<PathBuf, usize>,
}

impl WalkCollector {
    fn new(root: &str) -> Self {
        Self {
            root: root.to_string(),
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Record one visited entry. Entries whose parent directory was skipped
    /// (e.g. filtered out) are dropped.
    fn record(&mut self, os_path: &Path, depth: usize, is_dir: bool) {
        if depth == 0 {
            self.index.insert(os_path.to_path_buf(), self.entries.len());
            self.entries.push(WalkEntry {
                dir: self.root.clone(),
                subdirs: Vec::new(),
                files: Vec::new(),
            });
            return;
        }

        let Some(name) = os_path.file_name() else {
            return;
        };
        let name = name.to_string_lossy().into_owned();

        let Some(&parent_index) = os_path.parent().and_then(|p| self.index.get(p)) else {
            return;
        };

        if is_dir {
            let internal = join_path(&self.entries[parent_index].dir, &name);
            self.entries[parent_index].subdirs.push(name);
            self.index.insert(os_path.to_path_buf(), self.entries.len());
            self.entries.push(WalkEntry {
                dir: internal,
                subdirs: Vec::new(),
                files: Vec::new(),
            });
        } else {
            self.entries[parent_index].files.push(name);
        }
    }

    fn into_entries(self) -> Vec<WalkEntry> {
        self.entries
    }
}
