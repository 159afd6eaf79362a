//! Tool detection.
//!
//! Every external tool the build needs is modelled as a [`ToolProbe`]. A
//! probe knows its name, whether the build can proceed without it, and how
//! to locate a working installation. Probes run against a [`ProbeContext`]
//! that carries the PATH entries, an environment lookup, and any command
//! line overrides, so detection is fully scriptable from tests.

pub mod browser;
pub mod executable;
pub mod localization;
pub mod path_search;
pub mod posix;
pub mod runner;

pub use browser::BrowserProbe;
pub use executable::ExecutableProbe;
pub use localization::LocalizationProbe;
pub use posix::PosixProbe;

use std::collections::HashMap;
use std::env::VarError;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::fragment::ConfigFragment;
use runner::VersionCapture;

/// Outcome of one detection attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeResult {
    /// The tool was located; `value` is what the fragment should record,
    /// normally the resolved executable path.
    Found { value: String },
    /// No usable installation was discovered.
    NotFound,
}

impl ProbeResult {
    pub fn found(value: impl Into<String>) -> Self {
        ProbeResult::Found {
            value: value.into(),
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, ProbeResult::Found { .. })
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            ProbeResult::Found { value } => Some(value),
            ProbeResult::NotFound => None,
        }
    }
}

/// Detection inputs shared by all probes in one run.
///
/// The environment lookup is injected rather than read from the process so
/// tests can exercise PREFIX and BROWSER handling without mutating global
/// state.
pub struct ProbeContext {
    path_entries: Vec<PathBuf>,
    env_fn: Box<dyn Fn(&str) -> Result<String, VarError>>,
    overrides: HashMap<String, String>,
    timeout: Duration,
}

impl ProbeContext {
    pub fn new(
        path_entries: Vec<PathBuf>,
        env_fn: Box<dyn Fn(&str) -> Result<String, VarError>>,
        overrides: HashMap<String, String>,
        timeout: Duration,
    ) -> Self {
        Self {
            path_entries,
            env_fn,
            overrides,
            timeout,
        }
    }

    /// Environment variable lookup. Unset and empty both read as `None`.
    pub fn env(&self, name: &str) -> Option<String> {
        match (self.env_fn)(name) {
            Ok(value) if !value.is_empty() => Some(value),
            _ => None,
        }
    }

    /// Command line override for the named tool, if one was given.
    pub fn override_for(&self, tool: &str) -> Option<&str> {
        self.overrides.get(tool).map(String::as_str)
    }

    /// Search the PATH entries for an executable called `name`.
    pub fn locate(&self, name: &str) -> Option<PathBuf> {
        path_search::locate(name, &self.path_entries)
    }

    /// Run a version query against `exe`, bounded by the probe timeout.
    pub fn capture(&self, exe: &Path, args: &[String]) -> std::io::Result<VersionCapture> {
        runner::capture_version_output(exe, args, self.timeout)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// A detectable external tool.
pub trait ToolProbe {
    /// Stable lowercase identifier. Doubles as the override flag name, so
    /// the probe registered as `yarn` can be pinned with `--yarn <path>`.
    fn name(&self) -> &str;

    /// Whether a failed detection aborts the run.
    fn required(&self) -> bool {
        false
    }

    /// Guidance printed when a required tool is missing.
    fn missing_hint(&self) -> String {
        format!("install {} and re-run ./configure", self.name())
    }

    /// Attempt to locate the tool.
    fn detect(&self, ctx: &ProbeContext) -> ProbeResult;

    /// Record this tool's entry in the fragment.
    ///
    /// The default writes `<name>exe=<value>` for a found tool and nothing
    /// for a missing one, so optional tools simply drop out of config.mk.
    fn contribute(&self, result: &ProbeResult, fragment: &mut ConfigFragment) {
        if let ProbeResult::Found { value } = result {
            fragment.set(&format!("{}exe", self.name()), value);
        }
    }
}
