//! Default values for depstitch configuration.
//!
//! This module provides centralized default values used across commands
//! and the manifest schema, ensuring consistency and avoiding duplication.

use std::path::PathBuf;

/// Default manifest filename, looked up in the working directory when no
/// `--manifest` flag is given.
pub const MANIFEST_FILE: &str = ".depstitch.yaml";

/// Stock header template stamped onto artifacts when the manifest does not
/// point at its own template file.
///
/// `{{version}}`, `{{now}}` and `{{license}}` are substituted at build
/// time; the trailing strict-mode directive becomes the sole one in the
/// stamped artifact.
pub const HEADER_TEMPLATE: &str = r#"/**
 * Sinon.JS {{version}}, {{now}}
 *
 * @author Christian Johansen (christian@cjohansen.no)
 * @author Contributors: https://github.com/cjohansen/Sinon.JS/blob/master/AUTHORS
 *
 * {{license}}
 */

"use strict";
"#;

/// Default package metadata file, relative to the manifest.
pub fn default_package() -> PathBuf {
    PathBuf::from("package.json")
}

/// Default raw license text file, relative to the manifest.
pub fn default_license() -> PathBuf {
    PathBuf::from("LICENSE")
}

/// Default output directory, relative to the manifest.
pub fn default_output() -> PathBuf {
    PathBuf::from("pkg")
}
