//! Disk/database set arithmetic for media references

use std::collections::HashSet;
use std::path::{Component, Path};

use eavclean_types::MediaFileRef;

/// Items of `left` with no case-insensitive match in `right`
///
/// Keeps `left`'s order and original casing.
#[must_use]
pub fn difference(left: &[MediaFileRef], right: &[MediaFileRef]) -> Vec<MediaFileRef> {
    let keys: HashSet<String> = right.iter().map(MediaFileRef::canonical_key).collect();
    left.iter()
        .filter(|file| !keys.contains(&file.canonical_key()))
        .cloned()
        .collect()
}

/// Drop exact repeats, keeping first occurrences in order
#[must_use]
pub fn dedup(files: Vec<MediaFileRef>) -> Vec<MediaFileRef> {
    let mut seen = HashSet::with_capacity(files.len());
    files
        .into_iter()
        .filter(|file| seen.insert(file.as_str().to_string()))
        .collect()
}

/// Reference for an absolute file path below `root`, in `/a/b/file.ext` form
///
/// Returns `None` for the root itself, paths outside `root`, paths with a
/// directory component listed in `skip_dirs`, and non UTF-8 names.
#[must_use]
pub fn to_file_ref(root: &Path, path: &Path, skip_dirs: &[String]) -> Option<MediaFileRef> {
    let relative = path.strip_prefix(root).ok()?;

    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(name) => parts.push(name.to_str()?),
            _ => return None,
        }
    }

    let (_, dirs) = parts.split_last()?;
    if dirs.iter().any(|dir| skip_dirs.iter().any(|skip| skip == dir)) {
        return None;
    }

    Some(MediaFileRef::new(format!("/{}", parts.join("/"))))
}

/// Absolute path of `file` below `root`
#[must_use]
pub fn resolve(root: &Path, file: &MediaFileRef) -> std::path::PathBuf {
    root.join(file.as_str().trim_start_matches('/'))
}
