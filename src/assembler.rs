//! # Artifact Assembly
//!
//! Orchestrates the build of every artifact declared in the manifest. Each
//! artifact runs a strictly sequential pipeline — resolve roots, merge,
//! apply post-processing steps in declared order, write, alias — with no
//! state shared between artifacts beyond the read-through source registry.
//!
//! Artifacts are independent of one another, so `build_all` dispatches
//! them across the rayon pool. The registry cache keeps every physical
//! file read at most once per run, and per-artifact output is fully
//! determined by its own inputs, so parallel assembly cannot reorder a
//! merge sequence. A failed artifact aborts only its own pipeline; the
//! remaining artifacts still build and every failure is reported with the
//! artifact's name.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::debug;
use rayon::prelude::*;

use crate::config::{ArtifactSpec, EmbedOp, Manifest, PostStep};
use crate::defaults;
use crate::error::{Error, Result};
use crate::merge;
use crate::registry::SourceRegistry;
use crate::template::{self, Variables};
use crate::version::{self, ProjectMetadata};
use crate::writer;

/// Strict-mode directive line owned by the stamped header.
const STRICT_DIRECTIVE: &str = "\"use strict\";\n";

/// Everything shared across artifact builds within one run.
#[derive(Debug)]
pub struct BuildContext<'a> {
    pub registry: &'a SourceRegistry,
    /// Directory the manifest lives in; root and library paths resolve
    /// against it.
    pub base_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Display name for the completion report.
    pub project: Option<String>,
    pub version: String,
    /// Build date, `YYYY/MM/DD`.
    pub now: String,
    /// License text already reformatted for block-comment embedding.
    pub license: String,
    pub header_template: String,
    /// Resolve and post-process but do not touch the filesystem.
    pub dry_run: bool,
}

impl<'a> BuildContext<'a> {
    /// Assemble a context from a parsed manifest: resolve project
    /// metadata, load and reformat the license text, and pick the header
    /// template.
    pub fn from_manifest(
        registry: &'a SourceRegistry,
        manifest: &Manifest,
        base_dir: &Path,
        output_override: Option<PathBuf>,
        dry_run: bool,
    ) -> Result<Self> {
        let metadata = version::resolve(manifest, base_dir)?;

        let license_path = base_dir.join(&manifest.license);
        let license_raw = fs::read_to_string(&license_path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                Error::MissingFile {
                    path: license_path.display().to_string(),
                    referenced_by: None,
                }
            } else {
                Error::Io(e)
            }
        })?;

        let header_template = match &manifest.header {
            Some(header) => {
                let header_path = base_dir.join(header);
                fs::read_to_string(&header_path).map_err(|e| {
                    if e.kind() == ErrorKind::NotFound {
                        Error::MissingFile {
                            path: header_path.display().to_string(),
                            referenced_by: None,
                        }
                    } else {
                        Error::Io(e)
                    }
                })?
            }
            None => defaults::HEADER_TEMPLATE.to_string(),
        };

        let ProjectMetadata { name, version } = metadata;

        Ok(Self {
            registry,
            base_dir: base_dir.to_path_buf(),
            output_dir: output_override.unwrap_or_else(|| base_dir.join(&manifest.output)),
            project: name,
            version,
            now: build_date(),
            license: format_license(&license_raw),
            header_template,
            dry_run,
        })
    }
}

/// One successfully built artifact.
#[derive(Debug)]
pub struct BuiltArtifact {
    pub name: String,
    pub path: PathBuf,
    pub alias: Option<PathBuf>,
    pub bytes: usize,
}

/// Build every artifact in the manifest across the rayon pool.
///
/// Returns one result per artifact, in manifest order. Failures carry the
/// artifact's name.
pub fn build_all(ctx: &BuildContext, artifacts: &[ArtifactSpec]) -> Vec<Result<BuiltArtifact>> {
    artifacts
        .par_iter()
        .map(|artifact| {
            build(ctx, artifact).map_err(|e| Error::Artifact {
                name: artifact.name.clone(),
                source: Box::new(e),
            })
        })
        .collect()
}

/// Build a single artifact: merge its roots, apply steps in declared
/// order, write the output, duplicate to the alias.
pub fn build(ctx: &BuildContext, artifact: &ArtifactSpec) -> Result<BuiltArtifact> {
    let mut vars = Variables::new();
    vars.insert("version".to_string(), ctx.version.clone());
    let filename = template::render(&artifact.output, &vars)?;

    let roots: Vec<PathBuf> = artifact
        .roots
        .iter()
        .map(|root| ctx.base_dir.join(root))
        .collect();
    let mut text = merge::merge(ctx.registry, &roots)?;

    for step in &artifact.steps {
        text = match step {
            PostStep::Header => stamp_header(ctx, text)?,
            PostStep::Embed(embed) => embed_libraries(ctx, embed, text)?,
        };
    }

    let path = ctx.output_dir.join(&filename);
    if !ctx.dry_run {
        writer::write_text(&path, &text)?;
    }

    // The alias is a pure duplicate of the versioned artifact.
    let alias = match &artifact.alias {
        Some(alias) => {
            let alias_path = ctx.output_dir.join(alias);
            if !ctx.dry_run {
                writer::write_text(&alias_path, &text)?;
            }
            Some(alias_path)
        }
        None => None,
    };

    debug!(
        "assembled artifact '{}' ({} bytes, {} roots)",
        artifact.name,
        text.len(),
        artifact.roots.len()
    );

    Ok(BuiltArtifact {
        name: artifact.name.clone(),
        path,
        alias,
        bytes: text.len(),
    })
}

/// Render the header template against `{version, license, now}` and
/// prepend it. Strict-mode directives already present in the body are
/// stripped so the header's own directive is the sole one.
fn stamp_header(ctx: &BuildContext, body: String) -> Result<String> {
    let mut vars = Variables::new();
    vars.insert("version".to_string(), ctx.version.clone());
    vars.insert("license".to_string(), ctx.license.clone());
    vars.insert("now".to_string(), ctx.now.clone());
    let header = template::render(&ctx.header_template, &vars)?;

    let body = body.replace(STRICT_DIRECTIVE, "");
    Ok(header + &body)
}

/// Wrap `body` in a self-invoking closure that concatenates the configured
/// foreign libraries ahead of it and exposes one named global binding,
/// attached to the host `window`-like global when present and an empty
/// object otherwise.
fn embed_libraries(ctx: &BuildContext, embed: &EmbedOp, body: String) -> Result<String> {
    let mut embedded = String::new();
    for library in &embed.libraries {
        let file = ctx.registry.load(&ctx.base_dir.join(&library.path))?;
        match &library.strip {
            Some(snippet) => embedded.push_str(&file.content.replacen(snippet.as_str(), "", 1)),
            None => embedded.push_str(&file.content),
        }
    }

    Ok(format!(
        "var {binding} = (function () {{\n{embedded}{body}return {binding};}}.call(typeof window != 'undefined' && window || {{}}));\n",
        binding = embed.binding,
        embedded = embedded,
        body = body,
    ))
}

/// Reformat raw license text for embedding inside a block comment:
/// trimmed, with every continuation line prefixed by ` * `.
pub fn format_license(raw: &str) -> String {
    raw.trim().lines().collect::<Vec<_>>().join("\n * ")
}

/// Local build date, zero-padded `YYYY/MM/DD`.
pub fn build_date() -> String {
    chrono::Local::now().format("%Y/%m/%d").to_string()
}
