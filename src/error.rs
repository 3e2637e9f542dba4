//! Error types for burrow operations.
//!
//! This module defines [`BurrowError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - `RegistryCorrupt` and `UnsupportedPlatform` are fatal: no operation
//!   proceeds on a corrupted registry or an unrecognized OS
//! - Every other kind is recovered at the operation boundary and reported
//!   to the caller; nothing is retried automatically
//! - Errors carry the offending name/path and the subprocess stderr tail
//!   where applicable, so failures are actionable without re-running

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for burrow operations.
#[derive(Debug, Error)]
pub enum BurrowError {
    /// The host OS is not one burrow knows how to drive.
    #[error("Unsupported platform: {os}")]
    UnsupportedPlatform { os: String },

    /// No Python interpreter could be located on PATH.
    #[error("No Python interpreter found (tried: {candidates})")]
    RuntimeNotFound { candidates: String },

    /// The interpreter was found but failed its health probe.
    #[error("Python at {interpreter} is not functional: {detail}")]
    RuntimeUnhealthy { interpreter: PathBuf, detail: String },

    /// The interpreter cannot create virtual environments.
    #[error("Python at {interpreter} lacks the venv module")]
    VenvModuleMissing { interpreter: PathBuf },

    /// Environment name contains disallowed characters.
    #[error("Invalid environment name '{name}': use letters, digits, '-' and '_' only")]
    InvalidName { name: String },

    /// An environment with this name (or its directory) already exists.
    #[error("Environment '{name}' already exists")]
    AlreadyExists { name: String },

    /// No environment with this name is registered, or its files are gone.
    #[error("Environment '{name}' not found{}", .detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default())]
    NotFound {
        name: String,
        detail: Option<String>,
    },

    /// Environment creation subprocess timed out or exited non-zero.
    #[error("Failed to create environment '{name}': {detail}")]
    CreationFailed { name: String, detail: String },

    /// The environment directory could not be deleted; its record is retained.
    #[error("Failed to remove environment '{name}' at {path}: {detail}")]
    RemovalFailed {
        name: String,
        path: PathBuf,
        detail: String,
    },

    /// Dependency manifest file does not exist.
    #[error("Manifest not found: {path}")]
    ManifestNotFound { path: PathBuf },

    /// Dependency installation subprocess failed.
    #[error("Dependency install failed for '{name}': {detail}")]
    InstallFailed { name: String, detail: String },

    /// The registry file exists but cannot be parsed. Manual intervention required.
    #[error("Registry at {path} is corrupt: {message}")]
    RegistryCorrupt { path: PathBuf, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BurrowError {
    /// Whether this error must abort the invocation outright.
    ///
    /// Fatal errors mean the foundations (registry file, host OS) cannot be
    /// trusted; per-operation recovery would only compound the damage.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            BurrowError::RegistryCorrupt { .. } | BurrowError::UnsupportedPlatform { .. }
        )
    }
}

/// Result type alias for burrow operations.
pub type Result<T> = std::result::Result<T, BurrowError>;
