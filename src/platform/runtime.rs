//! Ambient Python runtime validation.
//!
//! Creating an environment requires a functional interpreter with venv
//! capability on the host. The probes here run the interpreter as a child
//! process with a bounded timeout; nothing is cached between invocations.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use crate::error::{BurrowError, Result};
use crate::process::{self, RunOptions};

use super::detect::{parse_system_path, resolve_tool_path};
use super::profile::PlatformProfile;

/// Bound on each health probe. Creation has its own, longer bound.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// A validated ambient interpreter.
#[derive(Debug, Clone)]
pub struct RuntimeInfo {
    /// Absolute path of the interpreter binary.
    pub interpreter: PathBuf,

    /// Version string reported by the interpreter, e.g. "3.12.1".
    pub version: String,
}

/// Locate the ambient interpreter from the profile's candidate names.
pub fn locate_interpreter(profile: &PlatformProfile) -> Result<PathBuf> {
    let path_entries = parse_system_path();
    profile
        .interpreter_candidates
        .iter()
        .find_map(|candidate| resolve_tool_path(candidate, &path_entries))
        .ok_or_else(|| BurrowError::RuntimeNotFound {
            candidates: profile.interpreter_candidates.join(", "),
        })
}

/// Probe an interpreter's version with a bounded timeout.
///
/// Works for both the ambient interpreter and the one inside a freshly
/// created environment; the latter is how a record's realized version is
/// established.
pub fn probe_version(interpreter: &Path) -> Result<String> {
    let mut cmd = Command::new(interpreter);
    cmd.arg("--version");

    let output = process::run(cmd, &RunOptions::with_timeout(PROBE_TIMEOUT)).map_err(|e| {
        BurrowError::RuntimeUnhealthy {
            interpreter: interpreter.to_path_buf(),
            detail: e.to_string(),
        }
    })?;

    if !output.success() {
        return Err(BurrowError::RuntimeUnhealthy {
            interpreter: interpreter.to_path_buf(),
            detail: format!("version probe {}", output.status_detail()),
        });
    }

    // Old interpreters print the version banner to stderr.
    extract_version(&output.stdout)
        .or_else(|| extract_version(&output.stderr))
        .ok_or_else(|| BurrowError::RuntimeUnhealthy {
            interpreter: interpreter.to_path_buf(),
            detail: format!("unrecognized version output: {}", output.stdout.trim()),
        })
}

/// Validate that the host has a functional interpreter with venv capability.
///
/// Fails with `RuntimeNotFound` when no candidate executable is on PATH,
/// `RuntimeUnhealthy` when the version probe exits non-zero or times out,
/// and `VenvModuleMissing` when the environment-creation capability probe
/// fails.
pub fn validate_runtime(profile: &PlatformProfile) -> Result<RuntimeInfo> {
    let interpreter = locate_interpreter(profile)?;
    let version = probe_version(&interpreter)?;

    let mut cmd = Command::new(&interpreter);
    cmd.args(["-c", "import venv"]);
    let probe = process::run(cmd, &RunOptions::with_timeout(PROBE_TIMEOUT)).map_err(|e| {
        BurrowError::RuntimeUnhealthy {
            interpreter: interpreter.clone(),
            detail: e.to_string(),
        }
    })?;
    if !probe.success() {
        return Err(BurrowError::VenvModuleMissing {
            interpreter: interpreter.clone(),
        });
    }

    Ok(RuntimeInfo {
        interpreter,
        version,
    })
}

/// Extract a dotted version number from probe output.
pub fn extract_version(output: &str) -> Option<String> {
    let re = regex::Regex::new(r"(\d+\.\d+(?:\.\d+)?)").expect("static pattern");
    re.captures(output)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_version_from_banner() {
        assert_eq!(
            extract_version("Python 3.12.1"),
            Some("3.12.1".to_string())
        );
    }

    #[test]
    fn extract_version_two_part() {
        assert_eq!(extract_version("Python 3.9"), Some("3.9".to_string()));
    }

    #[test]
    fn extract_version_no_match() {
        assert!(extract_version("no version here").is_none());
    }

    #[cfg(unix)]
    mod probes {
        use super::*;
        use std::fs;
        use std::os::unix::fs::PermissionsExt;
        use tempfile::TempDir;

        fn fake_interpreter(dir: &Path, name: &str, script: &str) -> PathBuf {
            let path = dir.join(name);
            fs::write(&path, format!("#!/bin/sh\n{script}\n")).unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        #[test]
        fn probe_version_reads_banner() {
            let temp = TempDir::new().unwrap();
            let python = fake_interpreter(temp.path(), "python3", r#"echo "Python 3.12.1""#);
            assert_eq!(probe_version(&python).unwrap(), "3.12.1");
        }

        #[test]
        fn probe_version_reads_stderr_banner() {
            let temp = TempDir::new().unwrap();
            let python = fake_interpreter(temp.path(), "python", r#"echo "Python 2.7.18" >&2"#);
            assert_eq!(probe_version(&python).unwrap(), "2.7.18");
        }

        #[test]
        fn probe_version_unhealthy_on_nonzero_exit() {
            let temp = TempDir::new().unwrap();
            let python = fake_interpreter(temp.path(), "python3", "exit 1");
            let err = probe_version(&python).unwrap_err();
            assert!(matches!(err, BurrowError::RuntimeUnhealthy { .. }));
        }

        #[test]
        fn probe_version_unhealthy_on_garbage_output() {
            let temp = TempDir::new().unwrap();
            let python = fake_interpreter(temp.path(), "python3", "echo hello");
            let err = probe_version(&python).unwrap_err();
            assert!(matches!(err, BurrowError::RuntimeUnhealthy { .. }));
        }
    }
}
