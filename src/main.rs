//! burrow CLI entry point.

use std::process::ExitCode;

use burrow::cli::{Cli, CommandDispatcher};
use burrow::ui::create_ui;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("burrow=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("burrow=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("burrow starting with args: {:?}", cli);

    if cli.no_color || !burrow::ui::theme::should_use_colors() {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    let interactive = console::user_attended();
    let mut ui = create_ui(interactive, cli.quiet);

    let dispatcher = CommandDispatcher::new(cli.registry.clone());
    match dispatcher.dispatch(&cli, ui.as_mut()) {
        Ok(result) => ExitCode::from(result.exit_code as u8),
        Err(e) => {
            ui.error(&e.to_string());
            ExitCode::from(1)
        }
    }
}
