//! Run results and their terminal/JSON presentation.

use std::path::PathBuf;

use console::Style;
use serde::Serialize;

use crate::prefix::ResolvedPrefix;

/// How a run finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Probes executed; the fragment was written if emission is enabled.
    Completed,
    /// `--help` or `--version` short-circuited the run. Nothing was probed
    /// and nothing was written.
    HelpDisplayed,
}

/// One probe's outcome, in registration order.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeOutcome {
    pub tool: String,
    pub required: bool,
    pub found: bool,
    /// Resolved path or override value; absent when the tool is missing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl ProbeOutcome {
    pub fn found(tool: impl Into<String>, required: bool, value: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            required,
            found: true,
            value: Some(value.into()),
        }
    }

    pub fn missing(tool: impl Into<String>, required: bool) -> Self {
        Self {
            tool: tool.into(),
            required,
            found: false,
            value: None,
        }
    }
}

/// Everything one run produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub status: RunStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<ResolvedPrefix>,
    pub tools: Vec<ProbeOutcome>,
    /// One entry per missing optional tool, e.g. `find not found`.
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fragment_path: Option<PathBuf>,
}

impl RunReport {
    pub fn help_displayed() -> Self {
        Self {
            status: RunStatus::HelpDisplayed,
            prefix: None,
            tools: Vec::new(),
            warnings: Vec::new(),
            fragment_path: None,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Print the human-readable summary: one line per probe (stdout for
    /// hits, stderr for warnings), prefix first, fragment path last.
    pub fn print_human(&self, quiet: bool) {
        if quiet {
            return;
        }
        let theme = ReportTheme::auto();

        if let Some(prefix) = &self.prefix {
            println!(
                "{}",
                theme.format_success(&format!(
                    "prefix {} ({})",
                    prefix.path.display(),
                    prefix.source.label()
                ))
            );
        }

        for outcome in &self.tools {
            match &outcome.value {
                Some(value) => {
                    println!(
                        "{}",
                        theme.format_success(&format!("{} {}", outcome.tool, value))
                    );
                }
                None => {
                    eprintln!(
                        "{}",
                        theme.format_warning(&format!("{} not found", outcome.tool))
                    );
                }
            }
        }

        if let Some(path) = &self.fragment_path {
            println!(
                "{}",
                theme.format_success(&format!("wrote {}", path.display()))
            );
        }
    }
}

/// Print a fatal error to stderr. Never silenced by `--quiet`.
pub fn print_error(message: &str) {
    eprintln!("{}", ReportTheme::auto().format_error(message));
}

/// Terminal styling for summary lines.
#[derive(Debug, Clone)]
pub struct ReportTheme {
    success: Style,
    warning: Style,
    error: Style,
}

impl ReportTheme {
    pub fn new() -> Self {
        Self {
            success: Style::new().green(),
            warning: Style::new().color256(208),
            error: Style::new().red().bold(),
        }
    }

    /// Theme without colors (non-TTY or NO_COLOR).
    pub fn plain() -> Self {
        Self {
            success: Style::new(),
            warning: Style::new(),
            error: Style::new(),
        }
    }

    pub fn auto() -> Self {
        if should_use_colors() {
            Self::new()
        } else {
            Self::plain()
        }
    }

    pub fn format_success(&self, msg: &str) -> String {
        format!("{}", self.success.apply_to(format!("✓ {}", msg)))
    }

    pub fn format_warning(&self, msg: &str) -> String {
        format!("{}", self.warning.apply_to(format!("⚠ {}", msg)))
    }

    pub fn format_error(&self, msg: &str) -> String {
        format!("{}", self.error.apply_to(format!("✗ {}", msg)))
    }
}

impl Default for ReportTheme {
    fn default() -> Self {
        Self::new()
    }
}

/// Check if colors should be enabled.
pub fn should_use_colors() -> bool {
    // https://no-color.org/
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    console::Term::stdout().is_term()
}
