//! Resolved per-call options for aggregation and output.
//!
//! These structs are the immutable configuration handed to one disk-usage
//! call, produced by merging CLI arguments with config-file defaults.

use crate::usage::DEFAULT_BLOCK_SIZE;

/// Configuration for one aggregation call.
#[derive(Debug, Clone)]
pub struct DuOptions {
    /// Record per-file entries, not just directories.
    pub include_files: bool,

    /// Restrict the walk to entries not excluded by ignore rules.
    pub tracked_only: bool,

    /// Include hidden files and directories.
    pub include_hidden: bool,

    /// Maximum output depth (`None` = unlimited). Affects only which
    /// entries are emitted; the full tree is always walked.
    pub max_depth: Option<usize>,

    /// Block size in bytes used for rounding apparent sizes.
    pub block_size: u64,
}

impl Default for DuOptions {
    fn default() -> Self {
        Self {
            include_files: false,
            tracked_only: false,
            include_hidden: true,
            max_depth: None,
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }
}

/// Configuration for rendering results.
#[derive(Debug, Clone)]
pub struct OutputOptions {
    /// Render values with unit suffixes instead of raw block counts.
    pub human_readable: bool,

    /// Emit a single JSON document instead of plain lines.
    pub json: bool,

    /// Scaling base for human-readable rendering.
    pub unit_base: u64,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            human_readable: false,
            json: false,
            unit_base: DEFAULT_BLOCK_SIZE,
        }
    }
}
