//! Module grouping key for report tallies.

/// Key used for files that sit directly in the analysis root.
pub const ROOT_MODULE: &str = "(root)";

/// Module a file belongs to.
///
/// Takes the directory component at `segment` (0-based), falling back to the
/// first directory when the path is too shallow, and to `(root)` when the
/// file has no directory at all. Both `/` and `\` separate components.
pub fn module_of(file_path: &str, segment: usize) -> String {
    let is_separator = |c: char| c == '/' || c == '\\';
    let components: Vec<&str> = file_path
        .split(is_separator)
        .filter(|c| !c.is_empty() && *c != ".")
        .collect();

    let directories = match components.split_last() {
        Some((_, dirs)) => dirs,
        None => return ROOT_MODULE.to_string(),
    };

    directories
        .get(segment)
        .or_else(|| directories.first())
        .map(|d| d.to_string())
        .unwrap_or_else(|| ROOT_MODULE.to_string())
}
