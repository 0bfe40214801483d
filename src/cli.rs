//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;

/// depstitch - assemble distributable bundles from @depend directives
#[derive(Parser, Debug)]
#[command(name = "depstitch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build every artifact declared in the manifest
    Build(commands::build::BuildArgs),
    /// Display the dependency tree for each artifact's root files
    Tree(commands::tree::TreeArgs),
    /// Check the manifest and resolve every artifact without writing
    Validate(commands::validate::ValidateArgs),
    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(&self.log_level),
        )
        .init();

        match self.command {
            Commands::Build(args) => commands::build::execute(args, &self.color),
            Commands::Tree(args) => commands::tree::execute(args),
            Commands::Validate(args) => commands::validate::execute(args, &self.color),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}
