//! # Dependency Resolution
//!
//! Recursive expansion of root files into a deterministic, deduplicated,
//! topologically valid merge order.
//!
//! ## Process
//!
//! 1.  **Depth-First Expansion**: For each file, its declared dependencies
//!     are visited before the file itself, in declaration order. A
//!     dependency therefore lands strictly before every file that
//!     (transitively) requires it, and ties between independent
//!     dependencies are broken by declaration order, not by name.
//!
//! 2.  **First-Occurrence Deduplication**: An ordered emitted set is kept
//!     for the lifetime of the resolver. A file already emitted is skipped,
//!     keeping the position of its first appearance. Because the set is
//!     global to the resolver, deduplication also spans chains when
//!     multiple roots are resolved through the same instance.
//!
//! 3.  **Cycle Detection**: An explicit in-progress stack catches cyclic
//!     declarations before they can recurse unboundedly. The reported
//!     error names the offending cycle (`a.js -> b.js -> a.js`).

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::path::normalize;
use crate::registry::SourceRegistry;

/// Accumulates dependency chains across one or more root files.
pub struct Resolver<'a> {
    registry: &'a SourceRegistry,
    emitted: HashSet<PathBuf>,
    order: Vec<PathBuf>,
    in_progress: Vec<PathBuf>,
}

impl<'a> Resolver<'a> {
    pub fn new(registry: &'a SourceRegistry) -> Self {
        Self {
            registry,
            emitted: HashSet::new(),
            order: Vec::new(),
            in_progress: Vec::new(),
        }
    }

    /// Expand `root` and everything it transitively depends on into the
    /// accumulated order. May be called repeatedly; identities already
    /// emitted by earlier calls keep their position.
    pub fn resolve(&mut self, root: &Path) -> Result<()> {
        self.visit(&normalize(root), None)
    }

    /// The accumulated merge order.
    pub fn into_order(self) -> Vec<PathBuf> {
        self.order
    }

    fn visit(&mut self, path: &Path, referenced_by: Option<&Path>) -> Result<()> {
        if self.emitted.contains(path) {
            return Ok(());
        }

        if let Some(start) = self.in_progress.iter().position(|p| p == path) {
            let mut cycle: Vec<String> = self.in_progress[start..]
                .iter()
                .map(|p| p.display().to_string())
                .collect();
            cycle.push(path.display().to_string());
            return Err(Error::CycleDetected {
                cycle: cycle.join(" -> "),
            });
        }

        let file = self.registry.load(path).map_err(|e| match e {
            Error::MissingFile {
                path: missing,
                referenced_by: None,
            } => Error::MissingFile {
                path: missing,
                referenced_by: referenced_by.map(|r| r.display().to_string()),
            },
            other => other,
        })?;

        self.in_progress.push(path.to_path_buf());
        for dependency in &file.dependencies {
            self.visit(dependency, Some(path))?;
        }
        self.in_progress.pop();

        self.emitted.insert(path.to_path_buf());
        self.order.push(path.to_path_buf());
        Ok(())
    }
}

/// Resolve a single root into its full ordered chain: dependencies first,
/// the root itself last, every identity exactly once.
pub fn resolve_chain(registry: &SourceRegistry, root: &Path) -> Result<Vec<PathBuf>> {
    let mut resolver = Resolver::new(registry);
    resolver.resolve(root)?;
    Ok(resolver.into_order())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    fn depend_header(deps: &[&str]) -> String {
        let mut header = String::from("/**\n");
        for dep in deps {
            header.push_str(&format!(" * @depend {}\n", dep));
        }
        header.push_str(" */\n");
        header
    }

    #[test]
    fn test_chain_puts_dependency_before_dependent() {
        let dir = TempDir::new().unwrap();
        write(&dir, "util.js", "u\n");
        let core = write(&dir, "core.js", &(depend_header(&["util.js"]) + "c\n"));

        let registry = SourceRegistry::new().unwrap();
        let chain = resolve_chain(&registry, &core).unwrap();

        assert_eq!(
            chain,
            vec![dir.path().join("util.js"), dir.path().join("core.js")]
        );
    }

    #[test]
    fn test_chain_ends_with_requested_file() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.js", "a\n");
        write(&dir, "b.js", &(depend_header(&["a.js"]) + "b\n"));
        let c = write(&dir, "c.js", &(depend_header(&["b.js"]) + "c\n"));

        let registry = SourceRegistry::new().unwrap();
        let chain = resolve_chain(&registry, &c).unwrap();

        assert_eq!(chain.last().unwrap(), &dir.path().join("c.js"));
        assert_eq!(chain.len(), 3);
    }

    #[test]
    fn test_diamond_dependency_appears_once_at_first_occurrence() {
        // d -> b -> a, d -> c -> a: a must appear once, before b.
        let dir = TempDir::new().unwrap();
        write(&dir, "a.js", "a\n");
        write(&dir, "b.js", &(depend_header(&["a.js"]) + "b\n"));
        write(&dir, "c.js", &(depend_header(&["a.js"]) + "c\n"));
        let d = write(&dir, "d.js", &(depend_header(&["b.js", "c.js"]) + "d\n"));

        let registry = SourceRegistry::new().unwrap();
        let chain = resolve_chain(&registry, &d).unwrap();

        assert_eq!(
            chain,
            vec![
                dir.path().join("a.js"),
                dir.path().join("b.js"),
                dir.path().join("c.js"),
                dir.path().join("d.js"),
            ]
        );
    }

    #[test]
    fn test_independent_dependencies_keep_declaration_order() {
        // Declaration order, not alphabetical: z before m.
        let dir = TempDir::new().unwrap();
        write(&dir, "z.js", "z\n");
        write(&dir, "m.js", "m\n");
        let top = write(&dir, "top.js", &(depend_header(&["z.js", "m.js"]) + "t\n"));

        let registry = SourceRegistry::new().unwrap();
        let chain = resolve_chain(&registry, &top).unwrap();

        assert_eq!(
            chain,
            vec![
                dir.path().join("z.js"),
                dir.path().join("m.js"),
                dir.path().join("top.js"),
            ]
        );
    }

    #[test]
    fn test_self_reference_is_a_cycle() {
        let dir = TempDir::new().unwrap();
        let a = write(&dir, "a.js", &(depend_header(&["a.js"]) + "a\n"));

        let registry = SourceRegistry::new().unwrap();
        let err = resolve_chain(&registry, &a).unwrap_err();

        match err {
            Error::CycleDetected { cycle } => assert!(cycle.contains("a.js -> ")),
            other => panic!("expected CycleDetected, got {other}"),
        }
    }

    #[test]
    fn test_mutual_cycle_reports_offending_files() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.js", &(depend_header(&["b.js"]) + "a\n"));
        let b = write(&dir, "b.js", &(depend_header(&["a.js"]) + "b\n"));

        let registry = SourceRegistry::new().unwrap();
        let err = resolve_chain(&registry, &b).unwrap_err();

        match err {
            Error::CycleDetected { cycle } => {
                assert!(cycle.contains("a.js"));
                assert!(cycle.contains("b.js"));
            }
            other => panic!("expected CycleDetected, got {other}"),
        }
    }

    #[test]
    fn test_missing_dependency_names_the_referrer() {
        let dir = TempDir::new().unwrap();
        let core = write(&dir, "core.js", &(depend_header(&["gone.js"]) + "c\n"));

        let registry = SourceRegistry::new().unwrap();
        let err = resolve_chain(&registry, &core).unwrap_err();

        match err {
            Error::MissingFile { path, referenced_by } => {
                assert!(path.contains("gone.js"));
                assert!(referenced_by.unwrap().contains("core.js"));
            }
            other => panic!("expected MissingFile, got {other}"),
        }
    }

    #[test]
    fn test_shared_resolver_dedups_across_roots() {
        let dir = TempDir::new().unwrap();
        write(&dir, "x.js", "x\n");
        let x = dir.path().join("x.js");
        let y = write(&dir, "y.js", &(depend_header(&["x.js"]) + "y\n"));

        let registry = SourceRegistry::new().unwrap();
        let mut resolver = Resolver::new(&registry);
        resolver.resolve(&x).unwrap();
        resolver.resolve(&y).unwrap();

        assert_eq!(
            resolver.into_order(),
            vec![x.clone(), dir.path().join("y.js")]
        );
    }
}
