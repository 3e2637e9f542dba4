//! Host platform and shell detection.

use std::path::{Path, PathBuf};

/// The closed set of host platforms burrow can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformKind {
    Windows,
    MacOs,
    Linux,
    Unsupported,
}

impl PlatformKind {
    /// Classify the host OS.
    ///
    /// Never fails: an unrecognized OS is reported as `Unsupported`, and
    /// callers must check before attempting any lifecycle operation.
    pub fn detect() -> Self {
        if cfg!(target_os = "windows") {
            PlatformKind::Windows
        } else if cfg!(target_os = "macos") {
            PlatformKind::MacOs
        } else if cfg!(target_os = "linux") {
            PlatformKind::Linux
        } else {
            PlatformKind::Unsupported
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, PlatformKind::Unsupported)
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            PlatformKind::Windows => "Windows",
            PlatformKind::MacOs => "macOS",
            PlatformKind::Linux => "Linux",
            PlatformKind::Unsupported => std::env::consts::OS,
        }
    }
}

/// Known shell dialects.
///
/// Used only to format human-readable activation instructions; no burrow
/// behavior branches on the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellKind {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Cmd,
    Other,
}

impl ShellKind {
    /// Parse shell kind from an executable path or name.
    pub fn from_executable(exe: &str) -> Self {
        let name = Path::new(exe)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase();

        match name.as_str() {
            "bash" => ShellKind::Bash,
            "zsh" => ShellKind::Zsh,
            "fish" => ShellKind::Fish,
            "powershell" | "pwsh" => ShellKind::PowerShell,
            "cmd" => ShellKind::Cmd,
            _ => ShellKind::Other,
        }
    }

    /// Detect the caller's shell from the environment.
    ///
    /// `SHELL` on Unix, `COMSPEC` on Windows. Windows terminals running
    /// PowerShell still report cmd via COMSPEC; the activation text for
    /// both dialects is printed in that case, so the fallback is harmless.
    pub fn detect() -> Self {
        let exe = if cfg!(target_os = "windows") {
            std::env::var("COMSPEC").unwrap_or_else(|_| "cmd.exe".to_string())
        } else {
            std::env::var("SHELL").unwrap_or_else(|_| "/bin/sh".to_string())
        };
        Self::from_executable(&exe)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ShellKind::Bash => "bash",
            ShellKind::Zsh => "zsh",
            ShellKind::Fish => "fish",
            ShellKind::PowerShell => "powershell",
            ShellKind::Cmd => "cmd",
            ShellKind::Other => "sh",
        }
    }
}

/// Check whether a file has executable permission bits set.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// On Windows, executability is determined by file extension, not permission bits.
#[cfg(not(unix))]
pub fn is_executable(_path: &Path) -> bool {
    true
}

/// Parse the system PATH environment variable into a list of directories.
pub fn parse_system_path() -> Vec<PathBuf> {
    std::env::var_os("PATH")
        .map(|path| std::env::split_paths(&path).collect())
        .unwrap_or_default()
}

/// Resolve a tool's binary path by iterating over PATH entries.
///
/// Returns the first match that exists and is executable. Does NOT shell
/// out to `which`: `which` behavior varies across systems and is
/// sometimes a shell builtin with inconsistent error handling.
pub fn resolve_tool_path(tool: &str, path_entries: &[PathBuf]) -> Option<PathBuf> {
    for dir in path_entries {
        let candidate = dir.join(tool);
        if candidate.is_file() && is_executable(&candidate) {
            return Some(candidate);
        }
    }
    None
}
