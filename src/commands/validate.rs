//! # Validate Command Implementation
//!
//! This module implements the `validate` subcommand, which checks a
//! manifest without writing anything to disk.
//!
//! ## Functionality
//!
//! - **Manifest Validation**: parses the manifest and validates its
//!   structure.
//! - **Metadata Check**: resolves the project version and license text.
//! - **Full Resolution**: runs every artifact through the complete
//!   pipeline in dry-run mode, surfacing missing files, cyclic
//!   directives, and unresolved template variables exactly as a real
//!   build would.
//!
//! This command is a safe, read-only operation that does not modify any
//! files.

use anyhow::Result;
use clap::Args;
use std::path::{Path, PathBuf};

use depstitch::assembler::{self, BuildContext};
use depstitch::config;
use depstitch::defaults;
use depstitch::output::{emoji, OutputConfig};
use depstitch::registry::SourceRegistry;

/// Validate a manifest without building anything
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to the manifest file to validate
    #[arg(short, long, value_name = "FILE", env = "DEPSTITCH_MANIFEST")]
    pub manifest: Option<PathBuf>,
}

/// Execute the `validate` command.
pub fn execute(args: ValidateArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    let manifest_path = args
        .manifest
        .unwrap_or_else(|| PathBuf::from(defaults::MANIFEST_FILE));

    println!(
        "{} Validating manifest: {}",
        emoji(&out, "🔍", "[SCAN]"),
        manifest_path.display()
    );

    let manifest = match config::from_file(&manifest_path) {
        Ok(manifest) => {
            println!("{} Manifest parsed successfully", emoji(&out, "✅", "[OK]"));
            manifest
        }
        Err(e) => {
            println!("{} Manifest parsing failed: {}", emoji(&out, "❌", "[ERR]"), e);
            anyhow::bail!("validation failed");
        }
    };

    let base_dir = manifest_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();

    let registry = SourceRegistry::new()?;
    let ctx = match BuildContext::from_manifest(&registry, &manifest, &base_dir, None, true) {
        Ok(ctx) => {
            println!(
                "{} Project metadata resolved (version {})",
                emoji(&out, "✅", "[OK]"),
                ctx.version
            );
            ctx
        }
        Err(e) => {
            println!(
                "{} Project metadata resolution failed: {}",
                emoji(&out, "❌", "[ERR]"),
                e
            );
            anyhow::bail!("validation failed");
        }
    };

    let mut failures = 0;
    for result in assembler::build_all(&ctx, &manifest.artifacts) {
        match result {
            Ok(built) => println!(
                "{} artifact '{}' resolves ({} bytes)",
                emoji(&out, "✅", "[OK]"),
                built.name,
                built.bytes
            ),
            Err(e) => {
                failures += 1;
                println!("{} {}", emoji(&out, "❌", "[ERR]"), e);
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("validation failed for {} artifact(s)", failures);
    }

    println!(
        "{} {} artifact(s) valid",
        emoji(&out, "✅", "[OK]"),
        manifest.artifacts.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn scaffold(temp: &TempDir, manifest: &str) -> PathBuf {
        fs::write(temp.path().join("LICENSE"), "Copyright (c) tester\n").unwrap();
        fs::write(
            temp.path().join("package.json"),
            r#"{"version": "1.0.0"}"#,
        )
        .unwrap();
        let path = temp.path().join(".depstitch.yaml");
        fs::write(&path, manifest).unwrap();
        path
    }

    #[test]
    fn test_validate_missing_manifest() {
        let args = ValidateArgs {
            manifest: Some(PathBuf::from("/nonexistent/.depstitch.yaml")),
        };
        assert!(execute(args, "never").is_err());
    }

    #[test]
    fn test_validate_accepts_resolvable_manifest() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("core.js"), "var core = {};\n").unwrap();
        let manifest = scaffold(
            &temp,
            "artifacts:\n  - name: main\n    roots: [core.js]\n    output: out-{{version}}.js\n",
        );

        let args = ValidateArgs {
            manifest: Some(manifest),
        };
        execute(args, "never").unwrap();
    }

    #[test]
    fn test_validate_writes_nothing() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("core.js"), "var core = {};\n").unwrap();
        let manifest = scaffold(
            &temp,
            "artifacts:\n  - name: main\n    roots: [core.js]\n    output: out-{{version}}.js\n",
        );

        execute(
            ValidateArgs {
                manifest: Some(manifest),
            },
            "never",
        )
        .unwrap();

        assert!(!temp.path().join("pkg").exists());
    }

    #[test]
    fn test_validate_rejects_cyclic_manifest() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("a.js"),
            "/** @depend b.js */\nvar a = 1;\n",
        )
        .unwrap();
        fs::write(
            temp.path().join("b.js"),
            "/** @depend a.js */\nvar b = 2;\n",
        )
        .unwrap();
        let manifest = scaffold(
            &temp,
            "artifacts:\n  - name: main\n    roots: [a.js]\n    output: out-{{version}}.js\n",
        );

        let err = execute(
            ValidateArgs {
                manifest: Some(manifest),
            },
            "never",
        )
        .unwrap_err();
        assert!(err.to_string().contains("validation failed"));
    }
}
