use crate::error::Error;
use crate::result::Result;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path).map_err(Error::fs("create directory", path))?;
    }
    Ok(())
}

/// Remove `path` (directory tree or plain file) if present, then create it as an empty directory
pub fn reset_dir(path: &Path) -> Result<()> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => {
            fs::remove_dir_all(path).map_err(Error::fs("remove", path))?;
        }
        Ok(_) => {
            fs::remove_file(path).map_err(Error::fs("remove", path))?;
        }
        Err(_) => {}
    }

    fs::create_dir_all(path).map_err(Error::fs("create directory", path))?;
    Ok(())
}

/// Lexically normalise `path` into a relative path: roots and `.` are dropped,
/// `..` removes the component before it and never climbs above the start
pub fn normal_components(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::ParentDir => {
                out.pop();
            }
            _ => {}
        }
    }
    out
}

/// Resolve `path` the way the filesystem would, even when its tail does not exist yet
///
/// The longest existing ancestor is canonicalised (following symlinks and
/// `..`); the remaining components are applied on top of it lexically.
pub fn canonical_path(path: &Path) -> PathBuf {
    let components: Vec<Component> = path.components().collect();

    for split in (1..=components.len()).rev() {
        let head: PathBuf = components[..split].iter().collect();
        if let Ok(mut resolved) = fs::canonicalize(&head) {
            for component in &components[split..] {
                match component {
                    Component::Normal(part) => resolved.push(part),
                    Component::ParentDir => {
                        resolved.pop();
                    }
                    _ => {}
                }
            }
            return resolved;
        }
    }

    path.to_path_buf()
}

/// Zip entry name for `relative` under `prefix`, always `/`-separated
pub fn entry_name(prefix: &Path, relative: &Path) -> String {
    normal_components(prefix)
        .join(normal_components(relative))
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Whether two paths refer to the same file, falling back to textual comparison
pub fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
