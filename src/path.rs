//! Path manipulation utilities for depstitch
//!
//! Dependency directives name paths relative to the declaring file, so the
//! same physical file can be reached through different spellings
//! (`lib/./core.js`, `lib/util/../core.js`). Deduplication works on
//! identities, and the identity of a file is its lexically normalized
//! path.

use std::path::{Component, Path, PathBuf};

/// Lexically normalize a path: drop `.` components and fold `..` into the
/// preceding normal component where possible.
///
/// Purely textual, never touches the filesystem, and never follows
/// symlinks. Leading `..` components that cannot be folded are kept.
pub fn normalize(path: &Path) -> PathBuf {
    let mut parts: Vec<Component> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                // `/..` is `/`
                Some(Component::RootDir) => {}
                _ => parts.push(component),
            },
            _ => parts.push(component),
        }
    }

    let mut out = PathBuf::new();
    for component in parts {
        out.push(component.as_os_str());
    }

    if out.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        out
    }
}
