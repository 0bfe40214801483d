//! # Tree Command Implementation
//!
//! This module implements the `tree` subcommand, which displays the
//! dependency graph behind each artifact's root files in a hierarchical
//! format.
//!
//! ## Functionality
//!
//! - **Dependency Visualization**: one tree per root file, children being
//!   the file's declared dependencies in declaration order.
//! - **Cycle Tolerance**: a file that refers back to an ancestor is shown
//!   with a `(cycle)` marker instead of failing, so the command stays
//!   usable for diagnosing exactly the manifests that `build` rejects.
//!
//! This command is a safe, read-only operation that does not modify any
//! files.

use anyhow::Result;
use clap::Args;
use ptree::{print_tree, TreeItem};
use std::path::{Path, PathBuf};

use depstitch::config;
use depstitch::defaults;
use depstitch::path::normalize;
use depstitch::registry::SourceRegistry;

/// Display each artifact's dependency tree
#[derive(Args, Debug)]
pub struct TreeArgs {
    /// Path to the manifest file
    #[arg(short, long, value_name = "FILE", env = "DEPSTITCH_MANIFEST")]
    pub manifest: Option<PathBuf>,
}

/// Execute the `tree` command.
pub fn execute(args: TreeArgs) -> Result<()> {
    let manifest_path = args
        .manifest
        .unwrap_or_else(|| PathBuf::from(defaults::MANIFEST_FILE));

    let manifest = config::from_file(&manifest_path).map_err(|e| {
        anyhow::anyhow!(
            "Failed to load manifest from {}: {}",
            manifest_path.display(),
            e
        )
    })?;

    let base_dir = manifest_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();
    let registry = SourceRegistry::new()?;

    for artifact in &manifest.artifacts {
        println!("{}:", artifact.name);
        for root in &artifact.roots {
            let mut ancestors = Vec::new();
            let node = build_tree_node(&registry, &base_dir, &base_dir.join(root), &mut ancestors)?;
            print_tree(&node)
                .map_err(|e| anyhow::anyhow!("Failed to display tree: {}", e))?;
        }
        println!();
    }

    Ok(())
}

/// Build a tree node for `path`, recursing into its declared dependencies.
///
/// `ancestors` is the path stack from the root; hitting an ancestor again
/// produces a `(cycle)` leaf instead of recursing.
fn build_tree_node(
    registry: &SourceRegistry,
    base_dir: &Path,
    path: &Path,
    ancestors: &mut Vec<PathBuf>,
) -> Result<TreeNode> {
    let key = normalize(path);
    let label = key
        .strip_prefix(base_dir)
        .unwrap_or(&key)
        .display()
        .to_string();

    if ancestors.contains(&key) {
        return Ok(TreeNode {
            label: format!("{} (cycle)", label),
            children: vec![],
        });
    }

    let dependencies = registry.dependencies_of(&key)?;

    ancestors.push(key);
    let mut children = Vec::with_capacity(dependencies.len());
    for dependency in &dependencies {
        children.push(build_tree_node(registry, base_dir, dependency, ancestors)?);
    }
    ancestors.pop();

    Ok(TreeNode { label, children })
}

/// Tree node structure for ptree visualization
#[derive(Clone)]
struct TreeNode {
    label: String,
    children: Vec<TreeNode>,
}

impl TreeItem for TreeNode {
    type Child = TreeNode;

    fn write_self<W: std::io::Write>(
        &self,
        f: &mut W,
        _style: &ptree::Style,
    ) -> std::io::Result<()> {
        write!(f, "{}", self.label)
    }

    fn children(&self) -> std::borrow::Cow<'_, [Self::Child]> {
        std::borrow::Cow::Borrowed(&self.children)
    }
}
