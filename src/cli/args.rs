//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct. Invalid arguments exit
//! with code 2 (clap's native behavior); operation failures exit 1.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// burrow - Cross-platform isolated Python environment manager.
#[derive(Debug, Parser)]
#[command(name = "burrow")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the registry file (overrides ~/.burrow/registry.json)
    #[arg(long, global = true, env = crate::registry::REGISTRY_ENV, value_name = "PATH")]
    pub registry: Option<PathBuf>,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a new isolated environment
    Create(CreateArgs),

    /// Print the command that activates an environment in your shell
    Activate(ActivateArgs),

    /// List registered environments
    List(ListArgs),

    /// Remove an environment and its registry entry
    Remove(RemoveArgs),

    /// Install a dependency manifest into an existing environment
    Install(InstallArgs),

    /// Print the realized dependency set of an environment
    Freeze(FreezeArgs),

    /// Check the host: platform, shell, interpreter, developer tools
    Doctor(DoctorArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `create` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CreateArgs {
    /// Environment name (letters, digits, '-' and '_')
    pub name: String,

    /// Requested interpreter version, e.g. 3.11
    #[arg(long, value_name = "V")]
    pub runtime_version: Option<String>,

    /// Dependency manifest to install after creation
    #[arg(long, value_name = "PATH")]
    pub manifest: Option<PathBuf>,

    /// Free-text description stored with the environment
    #[arg(long, value_name = "TEXT")]
    pub description: Option<String>,
}

/// Arguments for the `activate` command.
#[derive(Debug, Clone, clap::Args)]
pub struct ActivateArgs {
    /// Environment name
    pub name: String,
}

/// Arguments for the `list` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `remove` command.
#[derive(Debug, Clone, clap::Args)]
pub struct RemoveArgs {
    /// Environment name
    pub name: String,

    /// Skip the confirmation prompt
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `install` command.
#[derive(Debug, Clone, clap::Args)]
pub struct InstallArgs {
    /// Environment name
    pub name: String,

    /// Dependency manifest to install
    #[arg(long, value_name = "PATH")]
    pub manifest: PathBuf,

    /// Record the manifest as the development manifest
    #[arg(long)]
    pub dev: bool,
}

/// Arguments for the `freeze` command.
#[derive(Debug, Clone, clap::Args)]
pub struct FreezeArgs {
    /// Environment name
    pub name: String,
}

/// Arguments for the `doctor` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct DoctorArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
