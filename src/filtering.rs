//! Output filtering and ordering for usage maps.
//!
//! This module provides the two post-processing steps applied to a computed
//! [`UsageMap`]: dropping entries below a maximum output depth, and turning
//! the map into a deterministic, displayable sequence.

use crate::usage::UsageMap;

/// Depth of `path` relative to `root`.
///
/// Depth is the number of path components strictly between the root and the
/// entry; the root itself has depth 0. Paths that are not under the root are
/// counted by their own components, which never happens for maps produced by
/// the aggregator.
///
/// # Examples
///
/// ```
/// # use repo_du::filtering::path_depth;
/// assert_eq!(path_depth(".", "."), 0);
/// assert_eq!(path_depth("./data_dir", "."), 1);
/// assert_eq!(path_depth("./data_dir/data", "."), 2);
/// ```
#[must_use]
pub fn path_depth(path: &str, root: &str) -> usize {
    if path == root {
        return 0;
    }

    let relative = match path.strip_prefix(root) {
        Some(rest) if rest.starts_with('/') => rest.trim_start_matches('/'),
        _ => path,
    };

    relative.split('/').filter(|c| !c.is_empty()).count()
}

/// Drop entries deeper than `max_depth` below `root`.
///
/// `None` leaves the map unchanged. `Some(0)` keeps only the root's own
/// aggregate, which is the summarize behavior. Filtering affects only which
/// entries are emitted, never which were computed: the full tree is always
/// walked, because deeper aggregates are needed to compute shallower ones.
#[must_use]
pub fn filter_depth(usage: UsageMap, root: &str, max_depth: Option<usize>) -> UsageMap {
    let Some(max_depth) = max_depth else {
        return usage;
    };

    usage
        .into_iter()
        .filter(|(path, _)| path_depth(path, root) <= max_depth)
        .collect()
}

/// Produce a deterministic ordering of (path, usage) pairs.
///
/// Entries are sorted lexicographically by path, except that the entry for
/// the query root is always placed last: it represents the grand total and
/// reads better at the bottom of a listing. A single-entry map needs no
/// reordering, since that entry must be the root.
#[must_use]
pub fn order_entries(usage: UsageMap, root: &str) -> Vec<(String, u64)> {
    let mut entries: Vec<(String, u64)> = usage.into_iter().collect();
    if entries.len() <= 1 {
        return entries;
    }

    // The root path (e.g. ".") would sort first; treat it as a synthetic
    // maximum key instead.
    entries.sort_by(|(a, _), (b, _)| (a == root).cmp(&(b == root)).then_with(|| a.cmp(b)));
    entries
}
