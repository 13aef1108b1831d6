//! Configuration types for the disk-usage tool.
//!
//! Split into the persistent configuration file layer ([`file`]) and the
//! resolved per-call option structs ([`options`]).

pub mod file;
pub mod options;

pub use file::FileConfig;
pub use options::{DuOptions, OutputOptions};
