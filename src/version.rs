//! # Project Metadata Lookup
//!
//! Supplies the version string (and project name, when available) used to
//! parameterize output filenames and the stamped header.
//!
//! The manifest may pin `version:` directly; otherwise the version is read
//! from a `package.json`-style metadata file next to the manifest. Either
//! way the version must parse as valid semver, so a typo in project
//! metadata fails the build up front instead of producing misnamed
//! artifacts.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use semver::Version;

use crate::config::Manifest;
use crate::error::{Error, Result};

/// Name and version backing one build run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectMetadata {
    /// Display name, used only for reporting.
    pub name: Option<String>,
    /// Semver version string.
    pub version: String,
}

/// Read `name` and `version` from a `package.json`-style file.
pub fn from_package_json(path: &Path) -> Result<ProjectMetadata> {
    let raw = fs::read_to_string(path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            Error::Version {
                message: format!("metadata file not found: {}", path.display()),
            }
        } else {
            Error::Io(e)
        }
    })?;

    let value: serde_json::Value = serde_json::from_str(&raw)?;

    let version = value
        .get("version")
        .and_then(|v| v.as_str())
        .ok_or_else(|| Error::Version {
            message: format!("no \"version\" field in {}", path.display()),
        })?;
    Version::parse(version)?;

    let name = value
        .get("name")
        .and_then(|v| v.as_str())
        .map(str::to_string);

    Ok(ProjectMetadata {
        name,
        version: version.to_string(),
    })
}

/// Resolve the metadata for a build: the manifest's pinned `version:` when
/// present, the package metadata file otherwise. A `name:` in the manifest
/// always wins over the package name.
pub fn resolve(manifest: &Manifest, base_dir: &Path) -> Result<ProjectMetadata> {
    let mut metadata = match &manifest.version {
        Some(version) => {
            Version::parse(version)?;
            ProjectMetadata {
                name: None,
                version: version.clone(),
            }
        }
        None => from_package_json(&base_dir.join(&manifest.package))?,
    };

    if manifest.name.is_some() {
        metadata.name = manifest.name.clone();
    }

    Ok(metadata)
}
