//! Installation prefix resolution.
//!
//! The prefix is the root path the built software installs under. Resolution
//! precedence, highest first:
//!
//! 1. `PREFIX` environment variable, honored only when it names an existing
//!    directory (a relocated checkout often exports it wholesale; a stale
//!    value must not win over an explicit flag);
//! 2. the `-p/--prefix` command-line value;
//! 3. the built-in default `/usr/local`.
//!
//! The environment lookup is injectable so precedence is testable without
//! mutating process-global state.

use std::env::VarError;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{RecceError, Result};

/// Built-in fallback prefix.
pub const DEFAULT_PREFIX: &str = "/usr/local";

/// Environment variable consulted before the command line.
pub const PREFIX_ENV_VAR: &str = "PREFIX";

/// Where a resolved prefix value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PrefixSource {
    /// `PREFIX` environment variable.
    Environment,
    /// `-p/--prefix` command-line flag.
    CliFlag,
    /// Built-in default.
    Default,
}

impl PrefixSource {
    /// Short human-readable label for summary lines.
    pub fn label(&self) -> &'static str {
        match self {
            PrefixSource::Environment => "from PREFIX",
            PrefixSource::CliFlag => "from --prefix",
            PrefixSource::Default => "default",
        }
    }
}

/// A prefix resolved for one run. Immutable once produced.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedPrefix {
    /// The installation root path.
    pub path: PathBuf,
    /// Which input supplied the value.
    pub source: PrefixSource,
}

// TODO: respect DESTDIR as a staging overlay on top of the prefix.

/// Resolve the installation prefix for this run.
///
/// `cli_value` is the `--prefix` argument if one was given. The environment
/// override only participates when it points at an existing directory; an
/// explicit CLI value is validated and rejected when structurally invalid
/// (empty, or an existing path that is not a directory). A CLI value naming
/// a nonexistent path is accepted — installation creates it later.
pub fn resolve_prefix<F>(cli_value: Option<&str>, env_fn: F) -> Result<ResolvedPrefix>
where
    F: Fn(&str) -> std::result::Result<String, VarError>,
{
    if let Ok(env_value) = env_fn(PREFIX_ENV_VAR) {
        if Path::new(&env_value).is_dir() {
            tracing::debug!(prefix = %env_value, "prefix taken from environment");
            return Ok(ResolvedPrefix {
                path: PathBuf::from(env_value),
                source: PrefixSource::Environment,
            });
        }
        tracing::debug!(
            prefix = %env_value,
            "PREFIX is set but is not an existing directory, ignoring"
        );
    }

    if let Some(value) = cli_value {
        validate_cli_prefix(value)?;
        tracing::debug!(prefix = %value, "prefix taken from command line");
        return Ok(ResolvedPrefix {
            path: PathBuf::from(value),
            source: PrefixSource::CliFlag,
        });
    }

    tracing::debug!(prefix = %DEFAULT_PREFIX, "prefix defaulted");
    Ok(ResolvedPrefix {
        path: PathBuf::from(DEFAULT_PREFIX),
        source: PrefixSource::Default,
    })
}

/// Reject structurally invalid explicit prefixes.
fn validate_cli_prefix(value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(RecceError::InvalidPrefix {
            value: value.to_string(),
            message: "prefix must not be empty".to_string(),
        });
    }

    let path = Path::new(value);
    if path.exists() && !path.is_dir() {
        return Err(RecceError::InvalidPrefix {
            value: value.to_string(),
            message: "path exists but is not a directory".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn no_env(_: &str) -> std::result::Result<String, VarError> {
        Err(VarError::NotPresent)
    }

    #[test]
    fn env_prefix_wins_over_cli() {
        let temp = TempDir::new().unwrap();
        let env_dir = temp.path().to_string_lossy().to_string();

        let resolved = resolve_prefix(Some("/opt/cli"), |var| {
            if var == PREFIX_ENV_VAR {
                Ok(env_dir.clone())
            } else {
                Err(VarError::NotPresent)
            }
        })
        .unwrap();

        assert_eq!(resolved.path, temp.path());
        assert_eq!(resolved.source, PrefixSource::Environment);
    }

    #[test]
    fn env_prefix_ignored_when_not_a_directory() {
        let resolved = resolve_prefix(Some("/opt/cli"), |var| {
            if var == PREFIX_ENV_VAR {
                Ok("/nonexistent/env/prefix".to_string())
            } else {
                Err(VarError::NotPresent)
            }
        })
        .unwrap();

        assert_eq!(resolved.path, PathBuf::from("/opt/cli"));
        assert_eq!(resolved.source, PrefixSource::CliFlag);
    }

    #[test]
    fn cli_prefix_used_when_env_unset() {
        let resolved = resolve_prefix(Some("/opt/cli"), no_env).unwrap();
        assert_eq!(resolved.path, PathBuf::from("/opt/cli"));
        assert_eq!(resolved.source, PrefixSource::CliFlag);
    }

    #[test]
    fn default_prefix_when_nothing_supplied() {
        let resolved = resolve_prefix(None, no_env).unwrap();
        assert_eq!(resolved.path, PathBuf::from(DEFAULT_PREFIX));
        assert_eq!(resolved.source, PrefixSource::Default);
    }

    #[test]
    fn nonexistent_cli_prefix_is_accepted() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("not-created-yet");
        let resolved = resolve_prefix(Some(&missing.to_string_lossy()), no_env).unwrap();
        assert_eq!(resolved.path, missing);
    }

    #[test]
    fn empty_cli_prefix_is_rejected() {
        let err = resolve_prefix(Some(""), no_env).unwrap_err();
        assert!(matches!(err, RecceError::InvalidPrefix { .. }));
    }

    #[test]
    fn file_cli_prefix_is_rejected() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("occupied");
        std::fs::write(&file, "not a dir").unwrap();

        let err = resolve_prefix(Some(&file.to_string_lossy()), no_env).unwrap_err();
        match err {
            RecceError::InvalidPrefix { message, .. } => {
                assert!(message.contains("not a directory"));
            }
            other => panic!("Expected InvalidPrefix, got {:?}", other),
        }
    }

    #[test]
    fn env_prefix_empty_string_falls_through() {
        let resolved = resolve_prefix(None, |var| {
            if var == PREFIX_ENV_VAR {
                Ok(String::new())
            } else {
                Err(VarError::NotPresent)
            }
        })
        .unwrap();
        assert_eq!(resolved.source, PrefixSource::Default);
    }

    #[test]
    fn source_labels_are_stable() {
        assert_eq!(PrefixSource::Environment.label(), "from PREFIX");
        assert_eq!(PrefixSource::CliFlag.label(), "from --prefix");
        assert_eq!(PrefixSource::Default.label(), "default");
    }
}
