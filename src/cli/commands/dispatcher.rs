//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, Commands};
use crate::error::Result;
use crate::manager::EnvironmentManager;
use crate::registry::RegistryStore;
use crate::ui::UserInterface;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command against the given UI, returning the result to
    /// map onto the process exit code.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Open the lifecycle manager over the registry at `path`, or the default
/// per-user registry when no override was given.
pub fn open_manager(registry: Option<&Path>) -> Result<EnvironmentManager> {
    let store = match registry {
        Some(path) => RegistryStore::open(path)?,
        None => RegistryStore::open_default()?,
    };
    Ok(EnvironmentManager::new(store))
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    registry: Option<PathBuf>,
}

impl CommandDispatcher {
    /// Create a new dispatcher with an optional registry override.
    pub fn new(registry: Option<PathBuf>) -> Self {
        Self { registry }
    }

    /// Registry override path, if any.
    pub fn registry(&self) -> Option<&Path> {
        self.registry.as_deref()
    }

    /// Dispatch and execute a command.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let registry = self.registry();
        match &cli.command {
            Commands::Create(args) => {
                super::create::CreateCommand::new(registry, args.clone()).execute(ui)
            }
            Commands::Activate(args) => {
                super::activate::ActivateCommand::new(registry, args.clone()).execute(ui)
            }
            Commands::List(args) => {
                super::list::ListCommand::new(registry, args.clone()).execute(ui)
            }
            Commands::Remove(args) => {
                super::remove::RemoveCommand::new(registry, args.clone()).execute(ui)
            }
            Commands::Install(args) => {
                super::install::InstallCommand::new(registry, args.clone()).execute(ui)
            }
            Commands::Freeze(args) => {
                super::freeze::FreezeCommand::new(registry, args.clone()).execute(ui)
            }
            Commands::Doctor(args) => {
                super::doctor::DoctorCommand::new(registry, args.clone()).execute(ui)
            }
            Commands::Completions(args) => {
                super::completions::CompletionsCommand::new(args.clone()).execute(ui)
            }
        }
    }
}
