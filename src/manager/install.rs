//! Dependency installation into an environment.
//!
//! Installation is delegated to pip running under the environment's own
//! interpreter, never the caller's ambient one. That scoping is the core
//! isolation guarantee of the whole system. Manifest contents are passed to
//! pip verbatim; burrow does not parse or validate them.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{BurrowError, Result};
use crate::platform::PlatformProfile;
use crate::process::{self, ProcessOutput, RunOptions};
use crate::registry::EnvironmentRecord;

/// Captured result of one installer run.
///
/// The full output is kept so failures are diagnosable without re-running.
#[derive(Debug, Clone)]
pub struct InstallReport {
    /// Manifest that was applied.
    pub manifest: PathBuf,

    /// Installer exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    pub stdout: String,
    pub stderr: String,
    pub duration: Duration,
}

impl InstallReport {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// The stderr tail, for compact error reporting.
    pub fn failure_detail(&self) -> String {
        let output = ProcessOutput {
            exit_code: self.exit_code,
            stdout: self.stdout.clone(),
            stderr: self.stderr.clone(),
            duration: self.duration,
            timed_out: false,
        };
        format!("{}: {}", output.status_detail(), output.stderr_tail(10))
    }
}

/// Apply a manifest inside an environment.
///
/// Fails with `ManifestNotFound` when the manifest file does not exist and
/// `InstallFailed` when pip cannot be spawned at all. A pip run that exits
/// non-zero is still an `Ok` report; callers decide whether that is a
/// warning (best-effort install during create) or an error (standalone
/// install).
///
/// No timeout: installation duration is manifest-dependent, and killing a
/// half-finished install helps nobody. Callers may impose their own bound.
pub fn install(
    profile: &PlatformProfile,
    record: &EnvironmentRecord,
    manifest: &Path,
) -> Result<InstallReport> {
    if !manifest.is_file() {
        return Err(BurrowError::ManifestNotFound {
            path: manifest.to_path_buf(),
        });
    }

    let template = profile.install_command(&record.path, manifest);
    tracing::debug!(env = %record.name, command = %template, "installing manifest");

    let output =
        process::run(template.command(), &RunOptions::default()).map_err(|e| {
            BurrowError::InstallFailed {
                name: record.name.clone(),
                detail: format!("could not spawn installer: {e}"),
            }
        })?;

    tracing::debug!(
        env = %record.name,
        exit = ?output.exit_code,
        secs = output.duration.as_secs(),
        "installer finished"
    );

    Ok(InstallReport {
        manifest: manifest.to_path_buf(),
        exit_code: output.exit_code,
        stdout: output.stdout,
        stderr: output.stderr,
        duration: output.duration,
    })
}

/// List the environment's realized dependency set via `pip freeze`.
pub fn freeze(profile: &PlatformProfile, record: &EnvironmentRecord) -> Result<String> {
    let interpreter = profile.env_interpreter(&record.path);
    if !interpreter.exists() {
        return Err(BurrowError::NotFound {
            name: record.name.clone(),
            detail: Some(format!(
                "interpreter missing at {}",
                interpreter.display()
            )),
        });
    }

    let template = profile.freeze_command(&record.path);
    let output = process::run(template.command(), &RunOptions::default())
        .map_err(|e| BurrowError::RuntimeUnhealthy {
            interpreter: interpreter.clone(),
            detail: e.to_string(),
        })?;

    if !output.success() {
        return Err(BurrowError::RuntimeUnhealthy {
            interpreter,
            detail: format!("pip freeze {}: {}", output.status_detail(), output.stderr_tail(5)),
        });
    }

    Ok(output.stdout)
}
