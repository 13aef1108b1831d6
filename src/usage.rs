//! Disk-usage aggregation over a directory tree.
//!
//! This module provides the core aggregation logic: a bottom-up pass over a
//! directory tree that computes, for every directory, the total block usage
//! of everything transitively beneath it. Sizes are apparent sizes (logical
//! byte lengths) rounded up to whole blocks, matching the numbers reported
//! by GNU `du --apparent-size`.

use std::collections::HashMap;

use anyhow::Result;

use crate::config::DuOptions;
use crate::fs::{FileSystem, WalkOptions, join_path};

/// The GNU coreutils version of `du` defaults to a block size of 1024 bytes,
/// regardless of the block size actually configured for the file system.
/// We adopt the same convention here for consistency.
pub const DEFAULT_BLOCK_SIZE: u64 = 1024;

/// Mapping from path to usage in blocks, built during one aggregation pass.
///
/// Once a directory's entry is written it equals the sum of the block-rounded
/// sizes of every file transitively under it (plus the directory's own
/// rounded size, if the backing file system reports one). The map is created
/// fresh per call and never persists across calls.
pub type UsageMap = HashMap<String, u64>;

/// Convert an apparent byte size into a number of blocks, rounding up.
///
/// A missing size (`None`) contributes zero usage; this is a documented
/// approximation, not an error. A zero `block_size` falls back to
/// [`DEFAULT_BLOCK_SIZE`].
///
/// # Examples
///
/// ```
/// # use repo_du::usage::block_usage;
/// assert_eq!(block_usage(Some(1), 1024), 1);
/// assert_eq!(block_usage(Some(1025), 1024), 2);
/// assert_eq!(block_usage(None, 1024), 0);
/// ```
#[must_use]
pub const fn block_usage(size: Option<u64>, block_size: u64) -> u64 {
    let block_size = if block_size == 0 {
        DEFAULT_BLOCK_SIZE
    } else {
        block_size
    };

    match size {
        Some(bytes) => bytes.div_ceil(block_size),
        None => 0,
    }
}

/// Bottom-up disk-usage aggregator.
///
/// The `Aggregator` consumes the full top-down walk produced by a
/// [`FileSystem`] and computes a [`UsageMap`] for the whole tree in a single
/// pass. Processing the walk in reverse guarantees that every directory is
/// visited only after all of its subdirectories, because a child directory
/// is necessarily discovered after its parent in the top-down sequence.
pub struct Aggregator<'a> {
    /// The file system backing the walk and size lookups.
    fs: &'a dyn FileSystem,

    /// Options for one aggregation call.
    options: DuOptions,
}

impl<'a> Aggregator<'a> {
    /// Create an aggregator over the given file system with the given options.
    #[must_use]
    pub const fn new(fs: &'a dyn FileSystem, options: DuOptions) -> Self {
        Self { fs, options }
    }

    /// Compute the usage map for the tree rooted at `root`.
    ///
    /// The returned map holds one entry per directory (and one per file when
    /// `include_files` is set), expressed in blocks of the configured block
    /// size. The full tree is always walked, regardless of any output depth
    /// limit applied afterwards, because deeper aggregates are needed to
    /// compute shallower ones.
    ///
    /// # Errors
    ///
    /// Returns an error when the walk itself fails (e.g. the root path does
    /// not exist). An individual missing size lookup is never an error; it
    /// contributes zero usage.
    pub fn aggregate(&self, root: &str) -> Result<UsageMap> {
        let walk_options = WalkOptions {
            include_hidden: self.options.include_hidden,
            tracked_only: self.options.tracked_only,
        };
        let walk = self.fs.walk(root, &walk_options)?;

        let block_size = self.options.block_size;
        let mut usage_map = UsageMap::new();

        // Reversed top-down walk: children before parents, so every subdir
        // lookup below hits an entry that has already been computed.
        for entry in walk.iter().rev() {
            let mut file_total = 0u64;
            for name in &entry.files {
                let file_path = join_path(&entry.dir, name);
                let file_usage = block_usage(self.fs.size(&file_path), block_size);
                file_total += file_usage;

                if self.options.include_files {
                    usage_map.insert(file_path, file_usage);
                }
            }

            let subdir_total: u64 = entry
                .subdirs
                .iter()
                .map(|name| {
                    usage_map
                        .get(&join_path(&entry.dir, name))
                        .copied()
                        .unwrap_or(0)
                })
                .sum();

            let own_usage = block_usage(self.fs.size(&entry.dir), block_size);
            usage_map.insert(entry.dir.clone(), file_total + subdir_total + own_usage);
        }

        Ok(usage_map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mem::MemFileSystem;

    fn options(block_size: u64) -> DuOptions {
        DuOptions {
            include_files: false,
            tracked_only: false,
            include_hidden: true,
            max_depth: None,
            block_size,
        }
    }

    /// The reference tree: one subdirectory with a nested subdirectory, each
    /// holding one 2-block file, plus six 1-block top-level files.
    fn reference_fs() -> MemFileSystem {
        MemFileSystem::new(&[
            ("./foo", 1),
            ("./bar", 1),
            ("./code.py", 1),
            ("./params.yaml", 1),
            ("./plots.csv", 1),
            ("./metrics.json", 1),
            ("./data_dir/data", 2048),
            ("./data_dir/data_sub_dir/data_sub", 2048),
        ])
    }

    #[test]
    fn test_block_usage_rounds_up() {
        assert_eq!(block_usage(Some(0), 1024), 0);
        assert_eq!(block_usage(Some(1), 1024), 1);
        assert_eq!(block_usage(Some(1024), 1024), 1);
        assert_eq!(block_usage(Some(1025), 1024), 2);
        assert_eq!(block_usage(Some(2048), 1024), 2);
    }

    #[test]
    fn test_block_usage_missing_size_is_zero() {
        assert_eq!(block_usage(None, 1024), 0);
        assert_eq!(block_usage(None, 1), 0);
    }

    #[test]
    fn test_block_usage_zero_block_size_uses_default() {
        assert_eq!(block_usage(Some(1024), 0), 1);
        assert_eq!(block_usage(Some(1025), 0), 2);
    }

    #[test]
    fn test_aggregate_reference_tree() {
        let fs = reference_fs();
        let aggregator = Aggregator::new(&fs, options(1024));
        let usage = aggregator.aggregate(".").unwrap();

        assert_eq!(usage.get("./data_dir/data_sub_dir"), Some(&2));
        assert_eq!(usage.get("./data_dir"), Some(&4));
        assert_eq!(usage.get("."), Some(&10));
        assert_eq!(usage.len(), 3);
    }

    #[test]
    fn test_aggregate_invariant_holds_recursively() {
        let fs = reference_fs();
        let mut opts = options(1024);
        opts.include_files = true;
        let aggregator = Aggregator::new(&fs, opts);
        let usage = aggregator.aggregate(".").unwrap();

        // Every directory equals the sum of its direct files plus its
        // direct subdirectories.
        assert_eq!(
            usage["./data_dir"],
            usage["./data_dir/data"] + usage["./data_dir/data_sub_dir"]
        );
        assert_eq!(
            usage["./data_dir/data_sub_dir"],
            usage["./data_dir/data_sub_dir/data_sub"]
        );
        let top_files: u64 = [
            "./foo",
            "./bar",
            "./code.py",
            "./params.yaml",
            "./plots.csv",
            "./metrics.json",
        ]
        .iter()
        .map(|p| usage[*p])
        .sum();
        assert_eq!(usage["."], top_files + usage["./data_dir"]);
    }

    #[test]
    fn test_aggregate_without_include_files_emits_no_file_paths() {
        let fs = reference_fs();
        let aggregator = Aggregator::new(&fs, options(1024));
        let usage = aggregator.aggregate(".").unwrap();

        assert!(!usage.contains_key("./foo"));
        assert!(!usage.contains_key("./data_dir/data"));
    }

    #[test]
    fn test_aggregate_include_files_records_each_file() {
        let fs = reference_fs();
        let mut opts = options(1024);
        opts.include_files = true;
        let aggregator = Aggregator::new(&fs, opts);
        let usage = aggregator.aggregate(".").unwrap();

        assert_eq!(usage.get("./foo"), Some(&1));
        assert_eq!(usage.get("./data_dir/data"), Some(&2));
        assert_eq!(usage.get("./data_dir/data_sub_dir/data_sub"), Some(&2));
        // 3 directories + 8 files
        assert_eq!(usage.len(), 11);
    }

    #[test]
    fn test_aggregate_empty_directory_is_zero() {
        let fs = MemFileSystem::new(&[]).with_dir("./empty");
        let aggregator = Aggregator::new(&fs, options(1024));
        let usage = aggregator.aggregate(".").unwrap();

        assert_eq!(usage.get("./empty"), Some(&0));
        assert_eq!(usage.get("."), Some(&0));
    }

    #[test]
    fn test_aggregate_missing_file_size_contributes_zero() {
        let fs = reference_fs().with_unknown_size("./foo");
        let aggregator = Aggregator::new(&fs, options(1024));
        let usage = aggregator.aggregate(".").unwrap();

        assert_eq!(usage.get("."), Some(&9));
    }

    #[test]
    fn test_aggregate_counts_directory_own_size_when_reported() {
        let fs = reference_fs().with_dir_size("./data_dir", 4096);
        let aggregator = Aggregator::new(&fs, options(1024));
        let usage = aggregator.aggregate(".").unwrap();

        assert_eq!(usage.get("./data_dir"), Some(&8));
        assert_eq!(usage.get("."), Some(&14));
    }

    #[test]
    fn test_aggregate_custom_block_size() {
        let fs = reference_fs();
        let aggregator = Aggregator::new(&fs, options(512));
        let usage = aggregator.aggregate(".").unwrap();

        // 2048-byte files become 4 blocks each; 1-byte files stay 1 block.
        assert_eq!(usage.get("./data_dir/data_sub_dir"), Some(&4));
        assert_eq!(usage.get("./data_dir"), Some(&8));
        assert_eq!(usage.get("."), Some(&14));
    }

    #[test]
    fn test_aggregate_block_size_one_reports_raw_bytes() {
        let fs = reference_fs();
        let aggregator = Aggregator::new(&fs, options(1));
        let usage = aggregator.aggregate(".").unwrap();

        assert_eq!(usage.get("./data_dir"), Some(&4096));
        assert_eq!(usage.get("."), Some(&(4096 + 6)));
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let fs = reference_fs();
        let aggregator = Aggregator::new(&fs, options(1024));

        let first = aggregator.aggregate(".").unwrap();
        let second = aggregator.aggregate(".").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_aggregate_missing_root_fails() {
        let fs = reference_fs();
        let aggregator = Aggregator::new(&fs, options(1024));

        assert!(aggregator.aggregate("./no_such_dir").is_err());
    }
}
