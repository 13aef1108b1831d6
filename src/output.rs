//! Structured JSON output for scripting and piping.
//!
//! When the `--json` flag is passed, the ordered usage listing is serialized
//! to stdout as a single JSON document, replacing all human-readable output.
//! Values stay numeric (blocks of `block_size` bytes) so downstream tools
//! don't need to parse formatted strings.

use serde::Serialize;

/// Top-level JSON document emitted when `--json` is active.
#[derive(Serialize, Debug)]
pub struct JsonOutput {
    /// The query root, in normalized form.
    pub root: String,

    /// Block size in bytes that `usage` values are expressed in.
    pub block_size: u64,

    /// Ordered entries, root last.
    pub entries: Vec<JsonEntry>,

    /// Grand total: the root's own aggregate.
    pub total: u64,
}

/// A single (path, usage) entry in the JSON output.
#[derive(Serialize, Debug)]
pub struct JsonEntry {
    /// Normalized path relative to the query root.
    pub path: String,

    /// Usage in blocks of `block_size` bytes.
    pub usage: u64,
}

impl JsonOutput {
    /// Build a `JsonOutput` from an ordered listing.
    ///
    /// The total is taken from the root's entry; an ordering that filtered
    /// the root out (which the depth filter never does) yields 0.
    #[must_use]
    pub fn from_entries(entries: &[(String, u64)], root: &str, block_size: u64) -> Self {
        let total = entries
            .iter()
            .find(|(path, _)| path == root)
            .map_or(0, |(_, usage)| *usage);

        Self {
            root: root.to_string(),
            block_size,
            entries: entries
                .iter()
                .map(|(path, usage)| JsonEntry {
                    path: path.clone(),
                    usage: *usage,
                })
                .collect(),
            total,
        }
    }
}
