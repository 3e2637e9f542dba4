//! Command-line interface for burrow.
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations and dispatching

pub mod args;
pub mod commands;

pub use args::{
    ActivateArgs, Cli, Commands, CompletionsArgs, CreateArgs, DoctorArgs, FreezeArgs,
    InstallArgs, ListArgs, RemoveArgs,
};
pub use commands::{Command, CommandDispatcher, CommandResult};
