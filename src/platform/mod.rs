//! Host platform detection and command resolution.
//!
//! - [`detect`] - OS and shell classification, PATH walking
//! - [`profile`] - per-platform command templates and path conventions
//! - [`runtime`] - ambient interpreter health probes

pub mod detect;
pub mod profile;
pub mod runtime;

pub use detect::{PlatformKind, ShellKind};
pub use profile::{CommandTemplate, PlatformProfile, DEACTIVATE_COMMAND};
pub use runtime::{probe_version, validate_runtime, RuntimeInfo};
