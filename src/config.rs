//! # Manifest Schema and Parsing
//!
//! This module defines the data structures that represent the
//! `.depstitch.yaml` manifest, as well as the logic for parsing and
//! validating it.
//!
//! ## Key Components
//!
//! - **`Manifest`**: The whole build description — project metadata
//!   sources, output directory, and the artifact list.
//! - **`ArtifactSpec`**: One named output bundle: its root files (merged
//!   in declaration order), an output filename template parameterized by
//!   `{{version}}`, an optional unversioned alias, and the post-processing
//!   steps to apply after merging.
//! - **`PostStep`**: Externally tagged enum of post-processing steps.
//!   `- header` prepends the rendered license/version header; `- embed:`
//!   wraps the bundle in a self-invoking closure with foreign libraries
//!   concatenated ahead of it.
//!
//! Validation is structural only: referenced files are checked at build
//! time by the registry, not here.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Build description parsed from `.depstitch.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    /// Project display name; falls back to the package metadata name.
    #[serde(default)]
    pub name: Option<String>,

    /// Pinned version. When omitted, the version is read from `package`.
    #[serde(default)]
    pub version: Option<String>,

    /// `package.json`-style metadata file, relative to the manifest.
    #[serde(default = "crate::defaults::default_package")]
    pub package: PathBuf,

    /// Raw license text file used for header stamping.
    #[serde(default = "crate::defaults::default_license")]
    pub license: PathBuf,

    /// Header template file. The built-in stock template is used when
    /// omitted.
    #[serde(default)]
    pub header: Option<PathBuf>,

    /// Output directory for built artifacts, relative to the manifest.
    #[serde(default = "crate::defaults::default_output")]
    pub output: PathBuf,

    /// The artifacts to build.
    pub artifacts: Vec<ArtifactSpec>,
}

/// One named output bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactSpec {
    /// Artifact name, used in reports and error messages.
    pub name: String,

    /// Root files selected as starting points for dependency resolution,
    /// merged in declaration order. Relative to the manifest.
    pub roots: Vec<String>,

    /// Output filename template; `{{version}}` is substituted.
    pub output: String,

    /// Unversioned canonical duplicate of the built artifact.
    #[serde(default)]
    pub alias: Option<String>,

    /// Post-processing steps, applied in declared order after merging.
    #[serde(default)]
    pub steps: Vec<PostStep>,
}

/// A post-processing step applied to the merged text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostStep {
    /// Prepend the rendered license/version header and strip pre-existing
    /// strict-mode directives from the body.
    Header,
    /// Wrap the bundle in a self-invoking closure that embeds foreign
    /// libraries ahead of it.
    Embed(EmbedOp),
}

/// Embed step configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedOp {
    /// Name of the single global binding the closure exposes.
    pub binding: String,
    /// Externally sourced libraries concatenated ahead of the bundle, in
    /// declaration order.
    pub libraries: Vec<EmbedLibrary>,
}

/// One foreign library to embed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedLibrary {
    /// Library file, relative to the manifest.
    pub path: String,
    /// Literal snippet removed from the library text (first occurrence
    /// only) before embedding.
    #[serde(default)]
    pub strip: Option<String>,
}

/// Parse a manifest from YAML text.
pub fn parse(yaml: &str) -> Result<Manifest> {
    let manifest: Manifest = serde_yaml::from_str(yaml).map_err(|e| Error::ConfigParse {
        message: e.to_string(),
        hint: Some("expected a mapping with an 'artifacts:' list".to_string()),
    })?;
    validate(&manifest)?;
    Ok(manifest)
}

/// Load and parse a manifest file.
pub fn from_file(path: &Path) -> Result<Manifest> {
    let raw = fs::read_to_string(path).map_err(|e| Error::ConfigParse {
        message: format!("cannot read {}: {}", path.display(), e),
        hint: None,
    })?;
    parse(&raw)
}

fn validate(manifest: &Manifest) -> Result<()> {
    if manifest.artifacts.is_empty() {
        return Err(Error::ConfigParse {
            message: "no artifacts declared".to_string(),
            hint: Some("declare at least one entry under 'artifacts:'".to_string()),
        });
    }

    let mut seen = HashSet::new();
    for artifact in &manifest.artifacts {
        if !seen.insert(artifact.name.as_str()) {
            return Err(Error::ConfigParse {
                message: format!("duplicate artifact name '{}'", artifact.name),
                hint: Some("artifact names must be unique".to_string()),
            });
        }
        if artifact.roots.is_empty() {
            return Err(Error::ConfigParse {
                message: format!("artifact '{}' has no root files", artifact.name),
                hint: Some("list at least one file under 'roots:'".to_string()),
            });
        }
        if artifact.output.is_empty() {
            return Err(Error::ConfigParse {
                message: format!("artifact '{}' has an empty output template", artifact.name),
                hint: None,
            });
        }
        if artifact.alias.as_deref() == Some(artifact.output.as_str()) {
            return Err(Error::ConfigParse {
                message: format!(
                    "artifact '{}' aliases its own output template",
                    artifact.name
                ),
                hint: Some("the alias is the unversioned name; drop the alias or rename it".to_string()),
            });
        }
        for step in &artifact.steps {
            if let PostStep::Embed(embed) = step {
                if embed.binding.is_empty() {
                    return Err(Error::ConfigParse {
                        message: format!("artifact '{}' embeds with an empty binding", artifact.name),
                        hint: None,
                    });
                }
                if embed.libraries.is_empty() {
                    return Err(Error::ConfigParse {
                        message: format!(
                            "artifact '{}' embeds no libraries",
                            artifact.name
                        ),
                        hint: Some("list at least one entry under 'libraries:'".to_string()),
                    });
                }
            }
        }
    }

    Ok(())
}
