//! Terminal color theme.

use console::Style;

/// Styles used across burrow's terminal output.
#[derive(Debug, Clone)]
pub struct Theme {
    pub success: Style,
    pub warning: Style,
    pub error: Style,
    pub highlight: Style,
    pub dim: Style,
}

impl Theme {
    pub fn new() -> Self {
        Self {
            success: Style::new().green(),
            warning: Style::new().yellow(),
            error: Style::new().red().bold(),
            highlight: Style::new().cyan().bold(),
            dim: Style::new().dim(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether colored output should be used.
///
/// Respects the `NO_COLOR` convention and falls back to console's own
/// terminal detection.
pub fn should_use_colors() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    console::colors_enabled()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_constructs() {
        let theme = Theme::new();
        // Styles apply without panicking regardless of terminal state.
        let _ = theme.success.apply_to("ok").to_string();
        let _ = theme.error.apply_to("bad").to_string();
    }
}
