//! # Error Handling
//!
//! Centralized error type for all depstitch operations, built with
//! `thiserror`. Every failure mode in the build pipeline maps to one
//! variant carrying enough context to name the offending artifact, file,
//! or template variable in the final report.
//!
//! The taxonomy mirrors the pipeline: manifest parsing (`ConfigParse`),
//! source resolution (`MissingFile`, `CycleDetected`), header rendering
//! (`Template`), metadata lookup (`Version`), and disk output (`Write`).
//! The `Artifact` variant wraps any of these with the name of the artifact
//! whose build it aborted, so independent artifacts in the same run can
//! fail and be reported separately.
//!
//! There is no retry logic anywhere: every error here is a configuration
//! or environment defect meant to be fixed by the operator, and aborts the
//! enclosing artifact build immediately.

use thiserror::Error;

/// Main error type for depstitch operations
#[derive(Error, Debug)]
pub enum Error {
    /// An error occurred while parsing the manifest file.
    ///
    /// Includes the specific parsing issue and optionally a hint about how
    /// to fix it.
    #[error("Manifest parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the manifest issue
        hint: Option<String>,
    },

    /// A root or transitive dependency path does not resolve to a readable
    /// file.
    #[error("Missing source file: {path}{}", referenced_by.as_ref().map(|r| format!(" (referenced by {})", r)).unwrap_or_default())]
    MissingFile {
        path: String,
        /// The file whose directive referenced the missing path, if known
        referenced_by: Option<String>,
    },

    /// A dependency chain revisited a file still being expanded.
    #[error("Cycle detected in dependency directives: {cycle}")]
    CycleDetected { cycle: String },

    /// An error occurred during template rendering.
    ///
    /// An unresolved placeholder is fatal; the variable name is included
    /// when applicable.
    #[error("Template rendering error: {message}{}", variable.as_ref().map(|v| format!(" (variable: {})", v)).unwrap_or_default())]
    Template {
        message: String,
        /// The template variable that caused the error, if applicable
        variable: Option<String>,
    },

    /// Project metadata could not be read or did not contain a usable
    /// version.
    #[error("Version detection error: {message}")]
    Version { message: String },

    /// The filesystem writer could not persist an artifact.
    #[error("Write error for {path}: {message}")]
    Write { path: String, message: String },

    /// A failure scoped to one named artifact's build.
    #[error("artifact '{name}': {source}")]
    Artifact {
        name: String,
        #[source]
        source: Box<Error>,
    },

    /// An error indicating that a mutex or other lock has been poisoned.
    #[error("Lock poisoned: {context}")]
    LockPoisoned { context: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A JSON parsing error, wrapped from `serde_json::Error`.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// A regular expression error, wrapped from `regex::Error`.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// A semantic versioning parsing error, wrapped from `semver::Error`.
    #[error("Semver parsing error: {0}")]
    Semver(#[from] semver::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_config_parse() {
        let error = Error::ConfigParse {
            message: "Invalid YAML".to_string(),
            hint: None,
        };
        let display = format!("{}", error);
        assert!(display.contains("Manifest parsing error"));
        assert!(display.contains("Invalid YAML"));
    }

    #[test]
    fn test_error_display_config_parse_with_hint() {
        let error = Error::ConfigParse {
            message: "Missing artifacts list".to_string(),
            hint: Some("Add an 'artifacts:' list to the manifest".to_string()),
        };
        let display = format!("{}", error);
        assert!(display.contains("Manifest parsing error"));
        assert!(display.contains("Missing artifacts list"));
        assert!(display.contains("hint:"));
        assert!(display.contains("Add an 'artifacts:'"));
    }

    #[test]
    fn test_error_display_missing_file() {
        let error = Error::MissingFile {
            path: "lib/util.js".to_string(),
            referenced_by: None,
        };
        let display = format!("{}", error);
        assert!(display.contains("Missing source file"));
        assert!(display.contains("lib/util.js"));
        assert!(!display.contains("referenced by"));
    }

    #[test]
    fn test_error_display_missing_file_with_referrer() {
        let error = Error::MissingFile {
            path: "lib/util.js".to_string(),
            referenced_by: Some("lib/core.js".to_string()),
        };
        let display = format!("{}", error);
        assert!(display.contains("lib/util.js"));
        assert!(display.contains("(referenced by lib/core.js)"));
    }

    #[test]
    fn test_error_display_cycle_detected() {
        let error = Error::CycleDetected {
            cycle: "a.js -> b.js -> a.js".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Cycle detected"));
        assert!(display.contains("a.js -> b.js -> a.js"));
    }

    #[test]
    fn test_error_display_template() {
        let error = Error::Template {
            message: "unresolved template variable".to_string(),
            variable: Some("license".to_string()),
        };
        let display = format!("{}", error);
        assert!(display.contains("Template rendering error"));
        assert!(display.contains("(variable: license)"));
    }

    #[test]
    fn test_error_display_artifact_wraps_source() {
        let inner = Error::MissingFile {
            path: "lib/gone.js".to_string(),
            referenced_by: None,
        };
        let error = Error::Artifact {
            name: "main".to_string(),
            source: Box::new(inner),
        };
        let display = format!("{}", error);
        assert!(display.contains("artifact 'main'"));
        assert!(display.contains("lib/gone.js"));
    }

    #[test]
    fn test_error_display_write() {
        let error = Error::Write {
            path: "pkg/out.js".to_string(),
            message: "disk full".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Write error for pkg/out.js"));
        assert!(display.contains("disk full"));
    }

    #[test]
    fn test_error_from_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let error: Error = io_error.into();
        let display = format!("{}", error);
        assert!(display.contains("I/O error"));
        assert!(display.contains("File not found"));
    }

    #[test]
    fn test_error_from_yaml_error() {
        let yaml_str = "invalid: [unclosed";
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>(yaml_str).unwrap_err();
        let error: Error = yaml_error.into();
        let display = format!("{}", error);
        assert!(display.contains("YAML parsing error"));
    }
}
