//! burrow - Cross-platform isolated Python environment manager.
//!
//! burrow creates, tracks, and removes isolated Python virtual environments
//! behind one consistent lifecycle API. Divergent OS process models (command
//! shells, path and activation conventions, executable discovery) are
//! reconciled once into a [`platform::PlatformProfile`] and consumed
//! everywhere else as data, with durable state in a per-user JSON registry.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`error`] - Error types and result aliases
//! - [`manager`] - Environment lifecycle orchestration and dependency installs
//! - [`platform`] - Host detection and per-platform command resolution
//! - [`process`] - Child process execution with captured output and timeouts
//! - [`registry`] - Environment records and their durable registry
//! - [`ui`] - Terminal output, prompts, and spinners
//!
//! # Example
//!
//! ```no_run
//! use burrow::manager::{CreateOptions, EnvironmentManager};
//! use burrow::registry::RegistryStore;
//!
//! let store = RegistryStore::open_default()?;
//! let mut manager = EnvironmentManager::new(store);
//! let outcome = manager.create("scratch", &CreateOptions::default())?;
//! println!("created {} at {}", outcome.record.name, outcome.record.path.display());
//! # Ok::<(), burrow::BurrowError>(())
//! ```

pub mod cli;
pub mod error;
pub mod manager;
pub mod platform;
pub mod process;
pub mod registry;
pub mod ui;

pub use error::{BurrowError, Result};
