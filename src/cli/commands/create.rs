//! Create command implementation.

use std::path::{Path, PathBuf};

use crate::cli::args::CreateArgs;
use crate::error::Result;
use crate::manager::CreateOptions;
use crate::ui::UserInterface;

use super::dispatcher::{open_manager, Command, CommandResult};

/// The create command implementation.
pub struct CreateCommand {
    registry: Option<PathBuf>,
    args: CreateArgs,
}

impl CreateCommand {
    pub fn new(registry: Option<&Path>, args: CreateArgs) -> Self {
        Self {
            registry: registry.map(Path::to_path_buf),
            args,
        }
    }
}

impl Command for CreateCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut manager = open_manager(self.registry.as_deref())?;

        let options = CreateOptions {
            runtime_version: self.args.runtime_version.clone(),
            manifest: self.args.manifest.clone(),
            description: self.args.description.clone(),
        };

        let mut spinner =
            ui.start_spinner(&format!("Creating environment '{}'...", self.args.name));
        let outcome = match manager.create(&self.args.name, &options) {
            Ok(outcome) => {
                spinner.finish_success(&format!("Environment '{}' created", self.args.name));
                outcome
            }
            Err(e) => {
                spinner.finish_error(&format!("Could not create '{}'", self.args.name));
                return Err(e);
            }
        };

        ui.success(&format!(
            "Created '{}' (Python {}) at {}",
            outcome.record.name,
            outcome.record.runtime_version,
            outcome.record.path.display()
        ));

        // A manifest failure is a warning, not a failure: the environment
        // is usable, its dependencies are simply incomplete.
        match &outcome.install {
            Some(Ok(report)) => {
                ui.success(&format!(
                    "Installed manifest {} in {}s",
                    report.manifest.display(),
                    report.duration.as_secs()
                ));
            }
            Some(Err(e)) => {
                ui.warning(&format!("environment created, but {e}"));
            }
            None => {}
        }

        ui.message(&format!(
            "Activate it with: burrow activate {}",
            outcome.record.name
        ));
        Ok(CommandResult::success())
    }
}
