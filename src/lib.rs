//! Core library for the `repo-du` disk-usage tool.
//!
//! The pipeline is a strictly sequential chain of small pieces:
//!
//! 1. a [`fs::FileSystem`] produces a top-down walk of the tree;
//! 2. the [`usage::Aggregator`] consumes the walk in reverse and computes a
//!    usage map bottom-up (children before parents);
//! 3. [`filtering::filter_depth`] prunes entries below the requested depth;
//! 4. [`filtering::order_entries`] produces the display order (root last);
//! 5. [`format`] renders each value, plain or human-readable.
//!
//! All sizes are apparent sizes rounded up to whole blocks, matching
//! `du --apparent-size`. True on-disk accounting (sparse files, inode
//! overhead, fragmentation) is out of scope.

pub mod config;
pub mod filtering;
pub mod format;
pub mod fs;
pub mod output;
pub mod usage;

pub use config::{DuOptions, OutputOptions};
pub use usage::{Aggregator, UsageMap};
