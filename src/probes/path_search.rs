//! Executable lookup over search-path entries.
//!
//! Probes resolve tool names against an explicit list of directories rather
//! than shelling out to `which` — `which` behavior varies across systems and
//! is sometimes a shell builtin with inconsistent error handling.

use std::env::VarError;
use std::path::{Path, PathBuf};

/// Check whether a file has executable permission bits set.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// On Windows, executability is determined by file extension, not permission bits.
#[cfg(not(unix))]
pub fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Resolve an executable name against the search path.
///
/// Returns the first entry containing an executable file with that name. A
/// name containing a path separator (an explicit override like
/// `/opt/node/bin/node` or `./tools/yarn`) is checked directly instead of
/// searched.
pub fn locate(name: &str, path_entries: &[PathBuf]) -> Option<PathBuf> {
    if name.contains(std::path::MAIN_SEPARATOR) {
        let candidate = PathBuf::from(name);
        if candidate.is_file() && is_executable(&candidate) {
            return Some(candidate);
        }
        return None;
    }

    for dir in path_entries {
        let candidate = dir.join(name);
        if candidate.is_file() && is_executable(&candidate) {
            return Some(candidate);
        }
    }
    None
}

/// Parse a `PATH`-style value from the environment into directory entries.
///
/// Uses the supplied lookup so tests can supply a synthetic search path
/// without touching process-global environment variables.
pub fn parse_path_entries<F>(env_fn: F) -> Vec<PathBuf>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    env_fn("PATH")
        .map(|path| std::env::split_paths(&path).collect())
        .unwrap_or_default()
}
