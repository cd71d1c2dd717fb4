//! Path and filter utilities

use std::path::Path;

/// Separator used in storage paths regardless of platform.
pub const SEPARATOR: char = '/';

/// Strip trailing separators from a discovery root. A bare `/` stays `/`.
pub fn normalize_root(root: &str) -> String {
    let trimmed = root.trim_end_matches(SEPARATOR);
    if trimmed.is_empty() && root.starts_with(SEPARATOR) {
        SEPARATOR.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Path of `path` below `root`, or `None` if `path` is not strictly under `root`.
pub fn path_relative_to<'a>(path: &'a str, root: &str) -> Option<&'a str> {
    let root = root.trim_end_matches(SEPARATOR);
    path.strip_prefix(root)?
        .strip_prefix(SEPARATOR)
        .filter(|rel| !rel.is_empty())
}

/// Convert a filesystem path to a storage path string (forward slashes, no trailing separator).
pub fn path_to_storage_string(path: &Path) -> String {
    let s = path.to_string_lossy().replace('\\', "/");
    normalize_root(&s)
}

/// Last segment of a storage path.
pub fn file_name(path: &str) -> &str {
    path.rsplit(SEPARATOR).next().unwrap_or(path)
}

/// Check if a file should be excluded based on OS-specific hidden files
pub fn is_os_hidden_file(name: &str) -> bool {
    match name {
        // macOS
        ".DS_Store" | ".AppleDouble" | ".LSOverride" => true,
        // Windows
        "Thumbs.db" | "ehthumbs.db" | "Desktop.ini" | "$RECYCLE.BIN" => true,
        // Linux
        ".directory" => true,
        _ => name.starts_with("._") || name.starts_with(".Trash-"),
    }
}

/// Returns true if the listed entry should be kept (not hidden, not excluded).
pub fn should_include_entry(path: &str, exclude_patterns: &[String]) -> bool {
    let name = file_name(path);
    if is_os_hidden_file(name) {
        return false;
    }
    !exclude_patterns
        .iter()
        .any(|pattern| glob_match(pattern, name) || glob_match(pattern, path))
}

/// Simple glob pattern matching (supports * and ?)
pub fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();
    let (mut p, mut t) = (0, 0);
    // Position of the last '*' seen and the text index it currently absorbs up to.
    let mut star: Option<(usize, usize)> = None;

    while t < text.len() {
        match pattern.get(p) {
            Some('*') => {
                star = Some((p, t));
                p += 1;
            }
            Some('?') => {
                p += 1;
                t += 1;
            }
            Some(&c) if c == text[t] => {
                p += 1;
                t += 1;
            }
            _ => match star {
                Some((sp, st)) => {
                    p = sp + 1;
                    t = st + 1;
                    star = Some((sp, st + 1));
                }
                None => return false,
            },
        }
    }
    pattern[p..].iter().all(|&c| c == '*')
}
