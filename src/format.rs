//! Rendering of usage values for display.
//!
//! Plain mode prints the raw block count left-aligned in a fixed column.
//! Human-readable mode scales values by powers of the block size with GNU
//! `du`-compatible rounding: always upward, so usage is never under-reported.

use crate::usage::DEFAULT_BLOCK_SIZE;

/// Unit suffixes indexed by power of the scaling base.
const UNIT_SUFFIXES: [&str; 9] = ["", "K", "M", "G", "T", "P", "E", "Z", "Y"];

/// Width of the usage column in plain output.
const USAGE_COLUMN_WIDTH: usize = 8;

/// Render a usage value with unit suffixes, ceiling-rounded.
///
/// Zero renders as the literal `"0"`. Otherwise the value is scaled down by
/// `block_size` until it is below one unit step: values under 10 print with
/// one decimal digit (`1.0K`, `1.9G`), values of 10 and above print as
/// integers (`20G`, `100Z`). Both roundings are upward. A magnitude beyond
/// the largest known suffix renders with a `?` sentinel instead of failing.
/// A degenerate base (below 2) falls back to [`DEFAULT_BLOCK_SIZE`].
///
/// # Examples
///
/// ```
/// # use repo_du::format::human_readable;
/// assert_eq!(human_readable(0, 1024), "0");
/// assert_eq!(human_readable(1024, 1024), "1.0K");
/// assert_eq!(human_readable(20 * 1024 * 1024 * 1024, 1024), "20G");
/// ```
#[must_use]
pub fn human_readable(value: u64, block_size: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }

    let base = if block_size < 2 {
        DEFAULT_BLOCK_SIZE
    } else {
        block_size
    };

    // floor(log_base(value)) by integer division, exact for all u64 values.
    let mut unit_index = 0usize;
    let mut remaining = value;
    while remaining >= base {
        remaining /= base;
        unit_index += 1;
    }

    let suffix = UNIT_SUFFIXES.get(unit_index).copied().unwrap_or("?");

    #[allow(clippy::cast_precision_loss)]
    let scaled = value as f64 / (base as f64).powi(i32::try_from(unit_index).unwrap_or(i32::MAX));

    if scaled < 10.0 {
        let rounded = (scaled * 10.0).ceil() / 10.0;
        format!("{rounded:.1}{suffix}")
    } else {
        format!("{:.0}{suffix}", scaled.ceil())
    }
}

/// Format one output line for a (path, usage) pair.
///
/// Plain mode: the usage left-aligned to a fixed column width, then the
/// path. Human-readable mode: the rendered value in the same column.
#[must_use]
pub fn format_entry(path: &str, usage: u64, human_readable_mode: bool, block_size: u64) -> String {
    if human_readable_mode {
        let rendered = human_readable(usage, block_size);
        format!("{rendered:<USAGE_COLUMN_WIDTH$} {path}")
    } else {
        format!("{usage:<USAGE_COLUMN_WIDTH$} {path}")
    }
}
