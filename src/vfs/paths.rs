/*!
 * Virtual Paths
 * Normalization and prefix matching for `/`-separated virtual paths
 */

use path_clean::PathClean;
use std::path::{Path, MAIN_SEPARATOR};

use crate::core::limits::{PATH_SEPARATOR, VIRTUAL_ROOT};

/// Normalize a virtual path to an absolute form
///
/// Repeated separators collapse, `.` segments vanish and `..` pops the
/// previous segment without ever climbing above the root. The result always
/// starts with `/` and never ends with one, except for the root itself.
pub fn normalize(path: &str) -> String {
    let rooted = format!("{VIRTUAL_ROOT}{path}");
    let cleaned = Path::new(&rooted).clean();
    let mut normalized = cleaned.to_string_lossy().into_owned();
    if MAIN_SEPARATOR != PATH_SEPARATOR {
        normalized = normalized.replace(MAIN_SEPARATOR, "/");
    }
    if !normalized.starts_with(PATH_SEPARATOR) {
        normalized.insert(0, PATH_SEPARATOR);
    }
    normalized
}

/// Split a virtual path into its non-empty segments
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split(PATH_SEPARATOR)
        .filter(|segment| !segment.is_empty() && *segment != ".")
}

/// Strip a normalized `prefix` from a normalized `path` on a segment boundary
///
/// Returns the remainder without a leading separator, or `None` when
/// `prefix` does not cover `path`. `/data` covers `/data/a` but not
/// `/database`.
pub fn strip_mount_prefix<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    if prefix == VIRTUAL_ROOT {
        return Some(path.trim_start_matches(PATH_SEPARATOR));
    }
    let rest = path.strip_prefix(prefix)?;
    if rest.is_empty() {
        Some(rest)
    } else {
        rest.strip_prefix(PATH_SEPARATOR)
    }
}
