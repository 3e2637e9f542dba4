//! Activate command implementation.
//!
//! Activation reshapes the caller's interactive shell, which a child
//! process cannot do on its behalf. This command therefore prints the
//! activation command as text, raw on stdout so callers can
//! `eval "$(burrow activate NAME)"`, and never executes it.

use std::path::{Path, PathBuf};

use crate::cli::args::ActivateArgs;
use crate::error::Result;
use crate::platform::DEACTIVATE_COMMAND;
use crate::ui::UserInterface;

use super::dispatcher::{open_manager, Command, CommandResult};

/// The activate command implementation.
pub struct ActivateCommand {
    registry: Option<PathBuf>,
    args: ActivateArgs,
}

impl ActivateCommand {
    pub fn new(registry: Option<&Path>, args: ActivateArgs) -> Self {
        Self {
            registry: registry.map(Path::to_path_buf),
            args,
        }
    }
}

impl Command for ActivateCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut manager = open_manager(self.registry.as_deref())?;
        let command = manager.activation_command(&self.args.name)?;

        // The activation text is the command's contract: always on stdout,
        // even in quiet mode, with guidance kept out of the way on stderr.
        println!("{command}");
        if ui.is_interactive() {
            eprintln!(
                "# Run the line above in your shell, or: eval \"$(burrow activate {})\"",
                self.args.name
            );
            eprintln!("# Leave the environment later with: {DEACTIVATE_COMMAND}");
        }

        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BurrowError;
    use crate::ui::MockUI;
    use tempfile::TempDir;

    #[test]
    fn activate_unknown_environment_is_not_found() {
        let temp = TempDir::new().unwrap();
        let registry = temp.path().join("registry.json");
        let cmd = ActivateCommand::new(
            Some(&registry),
            ActivateArgs {
                name: "ghost".into(),
            },
        );
        let mut ui = MockUI::new();

        let err = cmd.execute(&mut ui).unwrap_err();
        assert!(matches!(err, BurrowError::NotFound { .. }));
    }
}
