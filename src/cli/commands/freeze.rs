//! Freeze command implementation.

use std::path::{Path, PathBuf};

use crate::cli::args::FreezeArgs;
use crate::error::Result;
use crate::ui::UserInterface;

use super::dispatcher::{open_manager, Command, CommandResult};

/// The freeze command implementation.
pub struct FreezeCommand {
    registry: Option<PathBuf>,
    args: FreezeArgs,
}

impl FreezeCommand {
    pub fn new(registry: Option<&Path>, args: FreezeArgs) -> Self {
        Self {
            registry: registry.map(Path::to_path_buf),
            args,
        }
    }
}

impl Command for FreezeCommand {
    fn execute(&self, _ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let manager = open_manager(self.registry.as_deref())?;
        let frozen = manager.freeze(&self.args.name)?;

        // Specifier list goes raw to stdout so it can be redirected
        // straight into a manifest file.
        print!("{frozen}");
        Ok(CommandResult::success())
    }
}
