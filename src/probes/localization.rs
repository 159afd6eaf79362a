//! Probe for Python-hosted localization tools.
//!
//! Distributions ship Babel's CLI either as a bare `pybabel` or with the
//! interpreter version baked into the name (`pybabel-3.11`). The probe
//! prefers the bare name, then walks the suffixed variants newest first.

use tracing::debug;

use super::{ProbeContext, ProbeResult, ToolProbe};

/// Interpreter minor versions probed for suffixed installs, newest first.
const NEWEST_MINOR: u32 = 13;
const OLDEST_MINOR: u32 = 7;

pub struct LocalizationProbe {
    name: String,
    base: String,
}

impl LocalizationProbe {
    pub fn new(name: impl Into<String>, base: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base: base.into(),
        }
    }

    fn candidates(&self) -> Vec<String> {
        let mut names = vec![self.base.clone()];
        for minor in (OLDEST_MINOR..=NEWEST_MINOR).rev() {
            names.push(format!("{}-3.{}", self.base, minor));
        }
        names
    }
}

impl ToolProbe for LocalizationProbe {
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

        for candidate in self.candidates() {
            if let Some(path) = ctx.locate(&candidate) {
                return ProbeResult::found(path.display().to_string());
            }
        }

        ProbeResult::NotFound
    }
}
