//! Canonical project-relative paths
//!
//! Every node identity in the tree, every open file and every navigation
//! entry goes through these helpers. The root of the project is the empty
//! string; no path ever carries a leading, trailing or doubled separator.

pub const SEPARATOR: char = '/';
pub const ROOT: &str = "";

/// Normalizes any separator convention (`\`, `//`, `./`) into canonical form.
pub fn normalize(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for segment in path
        .split(|c| c == SEPARATOR || c == '\\')
        .filter(|s| !s.is_empty() && *s != ".")
    {
        if !out.is_empty() {
            out.push(SEPARATOR);
        }
        out.push_str(segment);
    }
    out
}

/// Joins a parent directory and a child name into a canonical path.
pub fn join(parent: &str, child: &str) -> String {
    let parent = normalize(parent);
    let child = normalize(child);
    if parent.is_empty() {
        return child;
    }
    if child.is_empty() {
        return parent;
    }
    let mut out = String::with_capacity(parent.len() + child.len() + 1);
    out.push_str(&parent);
    out.push(SEPARATOR);
    out.push_str(&child);
    out
}

pub fn is_root(path: &str) -> bool {
    path.is_empty()
}

/// Parent of a canonical path; top-level entries have the root as parent.
pub fn parent(path: &str) -> Option<&str> {
    if path.is_empty() {
        return None;
    }
    match path.rfind(SEPARATOR) {
        Some(idx) => Some(&path[..idx]),
        None => Some(ROOT),
    }
}

pub fn file_name(path: &str) -> &str {
    match path.rfind(SEPARATOR) {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

/// True when `path` equals `ancestor` or lives beneath it.
pub fn is_within(path: &str, ancestor: &str) -> bool {
    if ancestor.is_empty() {
        return true;
    }
    match path.strip_prefix(ancestor) {
        Some("") => true,
        Some(rest) => rest.starts_with(SEPARATOR),
        None => false,
    }
}

/// Moves `path` from under `from` to under `to`, or `None` if unrelated.
pub fn rebase(path: &str, from: &str, to: &str) -> Option<String> {
    if !is_within(path, from) {
        return None;
    }
    let rest = &path[from.len()..];
    Some(join(to, rest))
}

#[cfg(test)]
#[path = "../../tests/unit/models/path.rs"]
mod tests;
