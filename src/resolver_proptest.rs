//! Property tests for resolver and merge invariants over generated
//! dependency graphs.
//!
//! Graphs are generated acyclic by construction (file `i` may only depend
//! on files with a smaller index), which lets the tests assert the
//! ordering, deduplication, and determinism guarantees on arbitrary
//! shapes instead of a handful of hand-written fixtures.

use std::fs;
use std::path::PathBuf;

use proptest::prelude::*;
use tempfile::TempDir;

use crate::merge;
use crate::registry::SourceRegistry;
use crate::resolver::resolve_chain;

/// Adjacency list: `dag[i]` are the indices file `i` depends on, all < i.
fn dag_strategy() -> impl Strategy<Value = Vec<Vec<usize>>> {
    (2usize..8).prop_flat_map(|n| {
        (0..n)
            .map(|i| {
                if i == 0 {
                    Just(Vec::new()).boxed()
                } else {
                    prop::collection::vec(0..i, 0..=2usize.min(i)).boxed()
                }
            })
            .collect::<Vec<BoxedStrategy<Vec<usize>>>>()
    })
}

fn file_name(index: usize) -> String {
    format!("f{index}.js")
}

/// Materialize the generated graph as real files with directive headers.
fn write_dag(dir: &TempDir, dag: &[Vec<usize>]) -> Vec<PathBuf> {
    dag.iter()
        .enumerate()
        .map(|(i, deps)| {
            let mut content = String::from("/**\n");
            for dep in deps {
                content.push_str(&format!(" * @depend {}\n", file_name(*dep)));
            }
            content.push_str(&format!(" */\nbody {i};\n"));

            let path = dir.path().join(file_name(i));
            fs::write(&path, content).unwrap();
            path
        })
        .collect()
}

proptest! {
    #[test]
    fn merge_order_emits_each_identity_once(dag in dag_strategy()) {
        let dir = TempDir::new().unwrap();
        let paths = write_dag(&dir, &dag);

        let registry = SourceRegistry::new().unwrap();
        let order = merge::merge_order(&registry, &paths).unwrap();

        prop_assert_eq!(order.len(), dag.len());
        let mut seen = std::collections::HashSet::new();
        for path in &order {
            prop_assert!(seen.insert(path.clone()), "duplicate identity {:?}", path);
        }
    }

    #[test]
    fn merge_order_puts_dependencies_first(dag in dag_strategy()) {
        let dir = TempDir::new().unwrap();
        let paths = write_dag(&dir, &dag);

        let registry = SourceRegistry::new().unwrap();
        let order = merge::merge_order(&registry, &paths).unwrap();
        let position = |i: usize| {
            order
                .iter()
                .position(|p| p == &dir.path().join(file_name(i)))
                .unwrap()
        };

        for (i, deps) in dag.iter().enumerate() {
            for dep in deps {
                prop_assert!(
                    position(*dep) < position(i),
                    "f{} must precede f{}",
                    dep,
                    i
                );
            }
        }
    }

    #[test]
    fn merge_is_deterministic_across_runs(dag in dag_strategy()) {
        let dir = TempDir::new().unwrap();
        let paths = write_dag(&dir, &dag);

        let first = merge::merge(&SourceRegistry::new().unwrap(), &paths).unwrap();
        let second = merge::merge(&SourceRegistry::new().unwrap(), &paths).unwrap();

        prop_assert_eq!(first, second);
    }

    #[test]
    fn chain_ends_with_its_root(dag in dag_strategy()) {
        let dir = TempDir::new().unwrap();
        let paths = write_dag(&dir, &dag);
        let root = paths.last().unwrap();

        let registry = SourceRegistry::new().unwrap();
        let chain = resolve_chain(&registry, root).unwrap();

        prop_assert_eq!(chain.last().unwrap(), root);
    }
}
