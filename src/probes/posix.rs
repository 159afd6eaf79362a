//! Presence checks for POSIX utilities.

use tracing::debug;

use super::{ProbeContext, ProbeResult, ToolProbe};

/// Checks that one POSIX utility (`find`, `xargs`, `msgmerge`, ...) is on
/// the search path. Presence only; these tools are assumed conformant when
/// installed.
pub struct PosixProbe {
    name: String,
}

impl PosixProbe {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl ToolProbe for PosixProbe {
    fn name(&self) -> &str {
        &self.name
    }

    fn detect(&self, ctx: &ProbeContext) -> ProbeResult {
        if let Some(value) = ctx.override_for(&self.name) {
            return match ctx.locate(value) {
                Some(path) => ProbeResult::found(path.display().to_string()),
                None => {
                    debug!(tool = %self.name, override_value = %value, "override not executable");
                    ProbeResult::NotFound
                }
            };
        }

        match ctx.locate(&self.name) {
            Some(path) => ProbeResult::found(path.display().to_string()),
            None => ProbeResult::NotFound,
        }
    }
}
