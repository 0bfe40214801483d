//! Build command implementation
//!
//! Runs the full assembly pipeline for every artifact in the manifest:
//! resolve roots, merge, post-process, write, alias. Artifacts build
//! independently; a failing artifact is reported with its name and does
//! not stop the others.

use anyhow::Result;
use clap::Args;
use std::path::{Path, PathBuf};
use std::time::Instant;

use depstitch::assembler::{self, BuildContext};
use depstitch::config;
use depstitch::defaults;
use depstitch::output::{emoji, OutputConfig};
use depstitch::registry::SourceRegistry;

/// Arguments for the build command
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Path to the manifest file
    #[arg(short, long, value_name = "FILE", env = "DEPSTITCH_MANIFEST")]
    pub manifest: Option<PathBuf>,

    /// Output directory (overrides the manifest's `output:`)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Resolve and merge everything but do not write any files
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// Execute the build command
pub fn execute(args: BuildArgs, color_flag: &str) -> Result<()> {
    let start = Instant::now();
    let out = OutputConfig::from_env_and_flag(color_flag);

    let manifest_path = args
        .manifest
        .unwrap_or_else(|| PathBuf::from(defaults::MANIFEST_FILE));
    if !manifest_path.exists() {
        anyhow::bail!("Manifest not found: {}", manifest_path.display());
    }

    let manifest = config::from_file(&manifest_path)?;
    let base_dir = manifest_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();

    let registry = SourceRegistry::new()?;
    let ctx = BuildContext::from_manifest(&registry, &manifest, &base_dir, args.output, args.dry_run)?;

    let results = assembler::build_all(&ctx, &manifest.artifacts);

    let mut failures = 0;
    for result in &results {
        match result {
            Ok(built) => {
                if !args.quiet {
                    let alias = built
                        .alias
                        .as_ref()
                        .map(|a| format!(" (+ {})", a.display()))
                        .unwrap_or_default();
                    println!(
                        "{} {} -> {}{}",
                        emoji(&out, "📦", "[OUT]"),
                        built.name,
                        built.path.display(),
                        alias
                    );
                }
            }
            Err(e) => {
                failures += 1;
                eprintln!("{} {}", emoji(&out, "❌", "[ERR]"), e);
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} artifacts failed", failures, results.len());
    }

    if !args.quiet {
        let project = ctx.project.clone().unwrap_or_else(|| "bundle".to_string());
        let verb = if args.dry_run { "Resolved" } else { "Built" };
        println!(
            "{} {} {} {} ({} artifacts in {:.2?})",
            emoji(&out, "✅", "[OK]"),
            verb,
            project,
            ctx.version,
            results.len(),
            start.elapsed()
        );
    }

    Ok(())
}
