//! # Merge Engine
//!
//! Flattens one or more root files into a single dependency-safe
//! concatenation. Each root is expanded through a shared [`Resolver`], so
//! deduplication is global across all chains (first occurrence wins,
//! keeping its position), and relative order across chains follows the
//! caller's root order.
//!
//! The result is pure given an immutable file tree: two invocations with
//! the same roots and same file contents produce byte-identical output.

use std::path::PathBuf;

use crate::error::Result;
use crate::registry::SourceRegistry;
use crate::resolver::Resolver;

/// The global merge order for `roots`: every root's chain in caller order,
/// deduplicated by first occurrence across chains.
pub fn merge_order(registry: &SourceRegistry, roots: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut resolver = Resolver::new(registry);
    for root in roots {
        resolver.resolve(root)?;
    }
    Ok(resolver.into_order())
}

/// Resolve `roots` and concatenate the contents of the resulting merge
/// set, joined with a single newline and ending with one trailing newline.
pub fn merge(registry: &SourceRegistry, roots: &[PathBuf]) -> Result<String> {
    let order = merge_order(registry, roots)?;

    let mut parts = Vec::with_capacity(order.len());
    for path in &order {
        parts.push(registry.load(path)?.content.clone());
    }

    Ok(parts.join("\n") + "\n")
}
