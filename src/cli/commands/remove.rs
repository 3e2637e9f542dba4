//! Remove command implementation.
//!
//! The confirmation prompt lives here, not in the lifecycle manager: by the
//! time the manager runs, the decision has been made. `--force` skips the
//! prompt entirely.

use std::path::{Path, PathBuf};

use crate::cli::args::RemoveArgs;
use crate::error::{BurrowError, Result};
use crate::ui::UserInterface;

use super::dispatcher::{open_manager, Command, CommandResult};

/// The remove command implementation.
pub struct RemoveCommand {
    registry: Option<PathBuf>,
    args: RemoveArgs,
}

impl RemoveCommand {
    pub fn new(registry: Option<&Path>, args: RemoveArgs) -> Self {
        Self {
            registry: registry.map(Path::to_path_buf),
            args,
        }
    }
}

impl Command for RemoveCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut manager = open_manager(self.registry.as_deref())?;

        let record = manager
            .store()
            .get(&self.args.name)
            .ok_or_else(|| BurrowError::NotFound {
                name: self.args.name.clone(),
                detail: None,
            })?
            .clone();

        if !self.args.force {
            let confirmed = ui.confirm(
                &format!(
                    "Remove environment '{}' and delete {}?",
                    record.name,
                    record.path.display()
                ),
                false,
            )?;
            if !confirmed {
                ui.message("Removal cancelled.");
                return Ok(CommandResult::success());
            }
        }

        manager.remove(&self.args.name)?;
        ui.success(&format!("Removed environment '{}'", self.args.name));
        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{EnvironmentRecord, RegistryStore};
    use crate::ui::MockUI;
    use std::fs;
    use tempfile::TempDir;

    fn args(name: &str, force: bool) -> RemoveArgs {
        RemoveArgs {
            name: name.to_string(),
            force,
        }
    }

    fn seed_with_dir(temp: &TempDir, name: &str) -> PathBuf {
        let registry = temp.path().join("registry.json");
        let env_path = temp.path().join("envs").join(name);
        fs::create_dir_all(&env_path).unwrap();
        let mut store = RegistryStore::open(&registry).unwrap();
        store
            .upsert(EnvironmentRecord::new(name, env_path.clone(), "3.12.1".into()))
            .unwrap();
        env_path
    }

    #[test]
    fn remove_missing_env_fails_not_found() {
        let temp = TempDir::new().unwrap();
        let registry = temp.path().join("registry.json");
        let cmd = RemoveCommand::new(Some(&registry), args("missing-env", true));
        let mut ui = MockUI::new();

        let err = cmd.execute(&mut ui).unwrap_err();
        assert!(matches!(err, BurrowError::NotFound { .. }));
    }

    #[test]
    fn remove_with_force_skips_confirmation() {
        let temp = TempDir::new().unwrap();
        let env_path = seed_with_dir(&temp, "doomed");
        let registry = temp.path().join("registry.json");

        let cmd = RemoveCommand::new(Some(&registry), args("doomed", true));
        let mut ui = MockUI::new();
        let result = cmd.execute(&mut ui).unwrap();

        assert!(result.success);
        assert!(ui.confirms_asked().is_empty());
        assert!(!env_path.exists());
    }

    #[test]
    fn remove_prompts_without_force() {
        let temp = TempDir::new().unwrap();
        let env_path = seed_with_dir(&temp, "asked");
        let registry = temp.path().join("registry.json");

        let cmd = RemoveCommand::new(Some(&registry), args("asked", false));
        let mut ui = MockUI::new();
        ui.queue_confirm(true);
        cmd.execute(&mut ui).unwrap();

        assert_eq!(ui.confirms_asked().len(), 1);
        assert!(ui.confirms_asked()[0].contains("asked"));
        assert!(!env_path.exists());
    }

    #[test]
    fn declined_confirmation_mutates_nothing() {
        let temp = TempDir::new().unwrap();
        let env_path = seed_with_dir(&temp, "spared");
        let registry = temp.path().join("registry.json");

        let cmd = RemoveCommand::new(Some(&registry), args("spared", false));
        let mut ui = MockUI::new();
        ui.queue_confirm(false);
        let result = cmd.execute(&mut ui).unwrap();

        assert!(result.success);
        assert!(env_path.exists());
        let store = RegistryStore::open(registry).unwrap();
        assert!(store.get("spared").is_some());
    }
}
