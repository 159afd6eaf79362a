//! Preferred-browser resolution.

use tracing::debug;

use super::{ProbeContext, ProbeResult, ToolProbe};

/// Preference-ordered fallback list, tried only when no override is set.
const BROWSER_CANDIDATES: &[&str] = &[
    "firefox",
    "chromium",
    "chromium-browser",
    "google-chrome",
    "epiphany",
];

/// Environment variable consulted before any detection.
const BROWSER_ENV_VAR: &str = "BROWSER";

/// Resolves the browser used for post-install smoke checks.
///
/// `BROWSER` in the environment wins and is recorded verbatim, without
/// checking that it names anything runnable; users pointing at wrapper
/// scripts or flatpak launchers know what they are doing. The `--browser`
/// override behaves the same way. Only the fallback candidates are
/// verified against the search path.
pub struct BrowserProbe {
    candidates: Vec<String>,
}

impl BrowserProbe {
    pub fn new() -> Self {
        Self {
            candidates: BROWSER_CANDIDATES.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Default for BrowserProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolProbe for BrowserProbe {
    fn name(&self) -> &str {
        "browser"
    }

    fn detect(&self, ctx: &ProbeContext) -> ProbeResult {
        if let Some(value) = ctx.env(BROWSER_ENV_VAR) {
            debug!(browser = %value, "using browser from BROWSER environment variable");
            return ProbeResult::found(value);
        }

        if let Some(value) = ctx.override_for(self.name()) {
            debug!(browser = %value, "using browser from command line override");
            return ProbeResult::found(value);
        }

        for candidate in &self.candidates {
            if let Some(path) = ctx.locate(candidate) {
                return ProbeResult::found(path.display().to_string());
            }
        }

        ProbeResult::NotFound
    }
}
