//! List command implementation.

use std::path::{Path, PathBuf};

use crate::cli::args::ListArgs;
use crate::error::Result;
use crate::ui::{Theme, UserInterface};

use super::dispatcher::{open_manager, Command, CommandResult};

/// The list command implementation.
pub struct ListCommand {
    registry: Option<PathBuf>,
    args: ListArgs,
}

impl ListCommand {
    pub fn new(registry: Option<&Path>, args: ListArgs) -> Self {
        Self {
            registry: registry.map(Path::to_path_buf),
            args,
        }
    }
}

impl Command for ListCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let manager = open_manager(self.registry.as_deref())?;
        let records = manager.list()?;

        if self.args.json {
            let json = serde_json::to_string_pretty(records)
                .map_err(|e| anyhow::anyhow!("failed to serialize listing: {e}"))?;
            println!("{json}");
            return Ok(CommandResult::success());
        }

        if records.is_empty() {
            ui.message("No environments registered. Create one with: burrow create <name>");
            return Ok(CommandResult::success());
        }

        let theme = Theme::new();
        for record in records {
            let detail = if record.description.is_empty() {
                String::new()
            } else {
                format!(" {}", theme.dim.apply_to(&record.description))
            };
            ui.message(&format!(
                "{} {}{}",
                theme.highlight.apply_to(&record.name),
                theme.dim.apply_to(format!("(Python {})", record.runtime_version)),
                detail
            ));
            ui.message(&format!("    {}", theme.dim.apply_to(record.path.display())));
            ui.message(&format!(
                "    {}",
                theme.dim.apply_to(format!(
                    "last used {}",
                    record.last_used_at.format("%Y-%m-%d %H:%M UTC")
                ))
            ));
        }

        Ok(CommandResult::success())
    }
}
