//! Interactive terminal UI.

use std::time::Duration;

use console::style;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};

use crate::error::Result;

use super::theme::Theme;
use super::{SpinnerHandle, UserInterface};

/// Terminal implementation of [`UserInterface`].
///
/// Messages go to stdout; warnings and errors go to stderr so that
/// machine-consumable stdout (activation text, `--json` output) stays
/// clean.
pub struct TerminalUI {
    interactive: bool,
    quiet: bool,
    theme: Theme,
}

impl TerminalUI {
    pub fn new(interactive: bool, quiet: bool) -> Self {
        Self {
            interactive,
            quiet,
            theme: Theme::new(),
        }
    }
}

impl UserInterface for TerminalUI {
    fn message(&mut self, msg: &str) {
        if !self.quiet {
            println!("{msg}");
        }
    }

    fn success(&mut self, msg: &str) {
        if !self.quiet {
            println!("{} {}", self.theme.success.apply_to("✓"), msg);
        }
    }

    fn warning(&mut self, msg: &str) {
        eprintln!("{} {}", self.theme.warning.apply_to("warning:"), msg);
    }

    fn error(&mut self, msg: &str) {
        eprintln!("{} {}", self.theme.error.apply_to("error:"), msg);
    }

    fn confirm(&mut self, question: &str, default: bool) -> Result<bool> {
        if !self.interactive {
            return Ok(default);
        }
        let answer = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(question)
            .default(default)
            .interact()
            .map_err(|e| anyhow::anyhow!("prompt failed: {e}"))?;
        Ok(answer)
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.quiet || !self.interactive {
            return Box::new(SilentSpinner);
        }
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .expect("static template")
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", ""]),
        );
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));
        Box::new(TerminalSpinner { bar })
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }
}

struct TerminalSpinner {
    bar: ProgressBar,
}

impl SpinnerHandle for TerminalSpinner {
    fn finish_success(&mut self, msg: &str) {
        self.bar
            .finish_with_message(format!("{} {}", style("✓").green(), msg));
    }

    fn finish_error(&mut self, msg: &str) {
        self.bar
            .finish_with_message(format!("{} {}", style("✗").red(), msg));
    }
}

/// No-op spinner for quiet and non-interactive sessions.
struct SilentSpinner;

impl SpinnerHandle for SilentSpinner {
    fn finish_success(&mut self, _msg: &str) {}

    fn finish_error(&mut self, _msg: &str) {}
}
