//! Install command implementation.
//!
//! Standalone installer invocation: unlike the best-effort install during
//! `create`, a missing manifest here is a hard error.

use std::path::{Path, PathBuf};

use crate::cli::args::InstallArgs;
use crate::error::{BurrowError, Result};
use crate::ui::UserInterface;

use super::dispatcher::{open_manager, Command, CommandResult};

/// The install command implementation.
pub struct InstallCommand {
    registry: Option<PathBuf>,
    args: InstallArgs,
}

impl InstallCommand {
    pub fn new(registry: Option<&Path>, args: InstallArgs) -> Self {
        Self {
            registry: registry.map(Path::to_path_buf),
            args,
        }
    }
}

impl Command for InstallCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut manager = open_manager(self.registry.as_deref())?;

        let mut spinner = ui.start_spinner(&format!(
            "Installing {} into '{}'...",
            self.args.manifest.display(),
            self.args.name
        ));
        let report = match manager.install(&self.args.name, &self.args.manifest, self.args.dev) {
            Ok(report) => {
                if report.success() {
                    spinner.finish_success("Install finished");
                } else {
                    spinner.finish_error("Install failed");
                }
                report
            }
            Err(e) => {
                spinner.finish_error("Install failed");
                return Err(e);
            }
        };

        // The installer's own output is the diagnostic; show it rather
        // than making the user re-run with more verbosity.
        for line in report.stdout.lines() {
            ui.message(line);
        }

        if report.success() {
            ui.success(&format!(
                "Installed {} into '{}' in {}s",
                report.manifest.display(),
                self.args.name,
                report.duration.as_secs()
            ));
            Ok(CommandResult::success())
        } else {
            Err(BurrowError::InstallFailed {
                name: self.args.name.clone(),
                detail: report.failure_detail(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{EnvironmentRecord, RegistryStore};
    use crate::ui::MockUI;
    use tempfile::TempDir;

    #[test]
    fn install_into_unknown_env_is_not_found() {
        let temp = TempDir::new().unwrap();
        let registry = temp.path().join("registry.json");
        let cmd = InstallCommand::new(
            Some(&registry),
            InstallArgs {
                name: "ghost".into(),
                manifest: temp.path().join("requirements.txt"),
                dev: false,
            },
        );
        let mut ui = MockUI::new();

        let err = cmd.execute(&mut ui).unwrap_err();
        assert!(matches!(err, BurrowError::NotFound { .. }));
    }

    #[test]
    fn install_missing_manifest_is_hard_error() {
        let temp = TempDir::new().unwrap();
        let registry = temp.path().join("registry.json");
        let env_path = temp.path().join("envs").join("demo");
        std::fs::create_dir_all(&env_path).unwrap();
        let mut store = RegistryStore::open(&registry).unwrap();
        store
            .upsert(EnvironmentRecord::new("demo", env_path, "3.12.1".into()))
            .unwrap();
        drop(store);

        let cmd = InstallCommand::new(
            Some(&registry),
            InstallArgs {
                name: "demo".into(),
                manifest: temp.path().join("nope.txt"),
                dev: false,
            },
        );
        let mut ui = MockUI::new();

        let err = cmd.execute(&mut ui).unwrap_err();
        assert!(matches!(err, BurrowError::ManifestNotFound { .. }));
    }
}
