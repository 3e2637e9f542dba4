//! Per-platform command templates and path conventions.
//!
//! All OS-specific knowledge lives here, resolved once into a
//! [`PlatformProfile`] value and passed everywhere else as data. No other
//! module branches on the platform.
//!
//! Resolution is pure: building a template never touches the filesystem and
//! never spawns anything. Whether a resolved command actually works is the
//! lifecycle manager's problem.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use super::detect::{PlatformKind, ShellKind};

/// A concrete program + argument vector, ready to spawn.
#[derive(Debug, Clone)]
pub struct CommandTemplate {
    pub program: OsString,
    pub args: Vec<OsString>,
}

impl CommandTemplate {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Build a [`std::process::Command`] from this template.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }
}

impl fmt::Display for CommandTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.to_string_lossy())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Resolved command templates and path conventions for one platform.
#[derive(Debug, Clone)]
pub struct PlatformProfile {
    pub platform: PlatformKind,

    /// Dialect tag for formatting activation instructions only.
    pub shell: ShellKind,

    /// Ambient interpreter names to try, in order, when locating Python.
    pub interpreter_candidates: &'static [&'static str],

    /// Directory inside an environment holding executables ("bin" or "Scripts").
    scripts_dir: &'static str,

    /// Name of the interpreter binary inside an environment.
    env_python: &'static str,
}

/// Token a user types to leave an active environment. Same on every platform.
pub const DEACTIVATE_COMMAND: &str = "deactivate";

impl PlatformProfile {
    /// Resolve the profile for a platform, with the given shell dialect.
    ///
    /// Returns `None` for [`PlatformKind::Unsupported`]; proceeding without
    /// a profile is a caller error.
    pub fn new(platform: PlatformKind, shell: ShellKind) -> Option<Self> {
        match platform {
            PlatformKind::Windows => Some(Self {
                platform,
                shell,
                interpreter_candidates: &["python.exe", "py.exe"],
                scripts_dir: "Scripts",
                env_python: "python.exe",
            }),
            PlatformKind::MacOs | PlatformKind::Linux => Some(Self {
                platform,
                shell,
                interpreter_candidates: &["python3", "python"],
                scripts_dir: "bin",
                env_python: "python",
            }),
            PlatformKind::Unsupported => None,
        }
    }

    /// Resolve the profile for the detected host platform and shell.
    pub fn current() -> Option<Self> {
        Self::new(PlatformKind::detect(), ShellKind::detect())
    }

    /// Template that creates an environment with a specific interpreter.
    pub fn create_command(&self, interpreter: &Path, env_path: &Path) -> CommandTemplate {
        CommandTemplate::new(interpreter)
            .arg("-m")
            .arg("venv")
            .arg(env_path)
    }

    /// Template that creates an environment with a version-qualified
    /// interpreter: the `py` launcher on Windows (`py -3.11`), a suffixed
    /// binary name elsewhere (`python3.11`).
    ///
    /// Resolution only; falling back to [`Self::create_command`] when the
    /// qualified form fails is the lifecycle manager's responsibility.
    pub fn versioned_create_command(&self, version: &str, env_path: &Path) -> CommandTemplate {
        let base = match self.platform {
            PlatformKind::Windows => CommandTemplate::new("py").arg(format!("-{version}")),
            _ => CommandTemplate::new(format!("python{version}")),
        };
        base.arg("-m").arg("venv").arg(env_path)
    }

    /// Path of the interpreter inside an environment.
    pub fn env_interpreter(&self, env_path: &Path) -> PathBuf {
        env_path.join(self.scripts_dir).join(self.env_python)
    }

    /// Path of the activation script inside an environment, used to detect
    /// drift between the registry and the filesystem.
    pub fn activation_script(&self, env_path: &Path) -> PathBuf {
        let name = match self.platform {
            PlatformKind::Windows => "activate.bat",
            _ => "activate",
        };
        env_path.join(self.scripts_dir).join(name)
    }

    /// The activation command for the caller's shell, as text.
    ///
    /// Activation mutates the shape of the caller's interactive session,
    /// which burrow cannot do on its behalf: this text is emitted for the
    /// caller to `eval` or paste, never executed here.
    pub fn activation_command(&self, env_path: &Path) -> String {
        let dir = env_path.join(self.scripts_dir);
        match self.shell {
            ShellKind::Fish => format!("source {}", dir.join("activate.fish").display()),
            ShellKind::PowerShell => format!("& \"{}\"", dir.join("Activate.ps1").display()),
            ShellKind::Cmd => format!("\"{}\"", dir.join("activate.bat").display()),
            ShellKind::Bash | ShellKind::Zsh | ShellKind::Other => {
                format!("source {}", dir.join("activate").display())
            }
        }
    }

    /// Template that installs a manifest into an environment, scoped to the
    /// environment's own interpreter, never the caller's ambient one.
    pub fn install_command(&self, env_path: &Path, manifest: &Path) -> CommandTemplate {
        CommandTemplate::new(self.env_interpreter(env_path))
            .arg("-m")
            .arg("pip")
            .arg("install")
            .arg("-r")
            .arg(manifest)
    }

    /// Template that lists the environment's realized dependency set.
    pub fn freeze_command(&self, env_path: &Path) -> CommandTemplate {
        CommandTemplate::new(self.env_interpreter(env_path))
            .arg("-m")
            .arg("pip")
            .arg("freeze")
    }
}
