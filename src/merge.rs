//! Non-normalizing path joining.
//!
//! Paths are combined the way scanners expect: `.` and `..` segments survive
//! literally, shared prefixes/suffixes collapse instead of duplicating, and no
//! percent-encoding is touched.

use crate::error::ParseError;
use crate::parser;

/// Joins two path fragments without normalization.
///
/// - one redundant boundary slash is trimmed (`/a/` + `/b` → `/a/b`)
/// - an empty side returns the other unchanged
/// - equal inputs return one copy
/// - a shared suffix or prefix collapses (`/blog` + `/blog/` → `/blog/`)
/// - otherwise exactly one `/` separates the concatenation
pub fn merge_paths(elem1: &str, elem2: &str) -> String {
    let mut elem2 = elem2.to_string();
    if elem1.ends_with('/') && elem2.starts_with('/') {
        elem2.remove(0);
    }

    if elem1.is_empty() {
        return elem2;
    }
    if elem2.is_empty() {
        return elem1.to_string();
    }

    if !elem1.ends_with('/') && !elem2.starts_with('/') {
        elem2.insert(0, '/');
    }

    if elem1 == elem2 {
        return elem1.to_string();
    }
    if elem1.len() > elem2.len() && elem1.ends_with(elem2.as_str()) {
        return elem1.to_string();
    }
    if elem2.len() > elem1.len() && elem2.starts_with(elem1) {
        return elem2;
    }
    format!("{elem1}{elem2}")
}

/// Merges two relative paths, including their query parameters, and returns
/// the combined relative form (`path?params#fragment`).
///
/// Both inputs are parsed in safe mode; no state is shared with any existing
/// [`Url`](crate::url_model::Url).
pub fn auto_merge_rel_paths(path1: &str, path2: &str) -> Result<String, ParseError> {
    let mut merged = parser::parse(path1)?;
    let other = parser::parse(path2)?;
    // A second input with no path (e.g. a bare host carrying only params)
    // still contributes its params.
    if !other.path.is_empty() {
        merged.merge_path(&other.path, false)?;
    }
    merged.params.merge(other.params);
    merged.resync();
    Ok(merged.relative_form())
}
