//! Path manipulation utilities for git-fleximod

use std::path::{Component, Path, PathBuf};

/// Compute the path of `to` relative to the directory `from`
///
/// Both paths should be absolute (or both relative to the same base) and
/// free of `.`/`..` segments; callers canonicalize first. The result walks
/// up with `..` out of `from` as far as the common prefix, then down into
/// `to`. Identical paths yield `.`.
pub fn relative_path(from: &Path, to: &Path) -> PathBuf {
    let from: Vec<Component> = from.components().collect();
    let to: Vec<Component> = to.components().collect();

    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut result = PathBuf::new();
    for _ in common..from.len() {
        result.push("..");
    }
    for component in &to[common..] {
        result.push(component.as_os_str());
    }

    if result.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        result
    }
}

/// Turn a manifest section header into a component name
///
/// `git` writes sections as `submodule "name"`; the quoted part is the
/// component name. Any other header is used verbatim.
pub fn section_component_name(section: &str) -> &str {
    let trimmed = section.trim();
    trimmed
        .strip_prefix("submodule")
        .map(str::trim_start)
        .and_then(|rest| rest.strip_prefix('"'))
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(trimmed)
}
