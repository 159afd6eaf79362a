//! Recce CLI entry point.
//!
//! Wires up the standard toolset the web frontends build against and runs
//! it. Embedders wanting a different toolset use the library directly.

use std::process::ExitCode;

use recce::{report, toolbox, BuildConfig, RecceError};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag or a non-empty `DEBUG` environment variable sets DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is WARN
///
/// Diagnostics go to stderr; stdout carries only the summary, so piping it
/// stays clean.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("recce=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("recce=warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    // The full parse happens inside run() where the dynamic tool flags are
    // known, so the subscriber setup scans the raw arguments.
    let debug = std::env::args().any(|arg| arg == "--debug")
        || std::env::var("DEBUG").is_ok_and(|v| !v.is_empty() && v != "0");
    init_tracing(debug);

    let mut config = BuildConfig::new();
    config.enable_prefix();
    config.enable_configmk();
    config.add_tool(toolbox::yarn());
    config.add_tool(toolbox::browser());
    config.add_tool(toolbox::pybabel());
    config.add_tool(toolbox::node());
    config.add_tool(toolbox::python());
    config.add_tool(toolbox::posix("find"));
    config.add_tool(toolbox::posix("xargs"));
    config.add_tool(toolbox::posix("msgmerge"));

    match config.run() {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            match &err {
                // clap's rendered message already carries usage and its own
                // error prefix
                RecceError::InvalidArguments { message } => eprintln!("{message}"),
                _ => report::print_error(&err.to_string()),
            }
            ExitCode::from(err.exit_code() as u8)
        }
    }
}
