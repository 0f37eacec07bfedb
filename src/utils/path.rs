//! Path utilities

use std::io;
use std::path::{Component, Path, PathBuf};

/// Resolve `path` the way `realpath` does, also for paths that do not exist yet
///
/// Existing paths are canonicalized. For a missing path the nearest existing
/// ancestor is canonicalized and the remaining components are appended.
pub fn resolve(path: &Path) -> io::Result<PathBuf> {
    if let Ok(resolved) = path.canonicalize() {
        return Ok(resolved);
    }

    let absolute = normalize(&if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    });

    let mut existing = absolute.as_path();
    let mut rest = Vec::new();
    loop {
        if let Ok(base) = existing.canonicalize() {
            let mut resolved = base;
            for part in rest.iter().rev() {
                resolved.push(part);
            }
            return Ok(resolved);
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                rest.push(name.to_os_string());
                existing = parent;
            }
            _ => break,
        }
    }
    Ok(absolute)
}

/// Lexically drop `.` and fold `..` components
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// True when both paths resolve to the same location
pub fn same_location(a: &Path, b: &Path) -> io::Result<bool> {
    Ok(resolve(a)? == resolve(b)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn existing_file_resolves_to_canonical() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.mkv");
        fs::write(&file, b"x").unwrap();
        let dotted = dir.path().join(".").join("a.mkv");
        assert!(same_location(&file, &dotted).unwrap());
    }

    #[test]
    fn missing_file_resolves_through_parent() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("sub").join("..").join("out.mkv");
        let resolved = resolve(&missing).unwrap();
        assert_eq!(
            resolved,
            dir.path().canonicalize().unwrap().join("out.mkv")
        );
    }

    #[test]
    fn different_files_differ() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.mkv");
        fs::write(&a, b"x").unwrap();
        assert!(!same_location(&a, &dir.path().join("b.mkv")).unwrap());
    }
}
