//! The generated build-configuration fragment.
//!
//! A [`ConfigFragment`] is an ordered set of `key=value` variable definitions
//! that a downstream build tool `include`s. Rendering is deterministic: the
//! same entries always produce byte-identical output (no timestamps), so
//! repeated runs with an unchanged environment leave the file unchanged.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{RecceError, Result};

/// File name of the generated fragment, relative to the output root.
pub const FRAGMENT_FILE: &str = "config.mk";

/// Banner comment emitted as the first line of every fragment.
pub const FRAGMENT_BANNER: &str = "# this file is autogenerated by ./configure";

/// Ordered collection of build variables destined for `config.mk`.
///
/// Entries keep insertion order; setting an existing key replaces its value
/// in place so the variable keeps its original position in the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigFragment {
    entries: Vec<(String, String)>,
}

impl ConfigFragment {
    /// Create an empty fragment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variable. Replaces the value in place if the key already exists.
    pub fn set(&mut self, key: &str, value: &str) {
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| k == key) {
            entry.1 = value.to_string();
        } else {
            self.entries.push((key.to_string(), value.to_string()));
        }
    }

    /// Look up a variable by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Number of variables in the fragment.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the fragment has no variables.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Render the fragment as file contents.
    ///
    /// One `key=value` line per entry after the banner, no quoting,
    /// newline-terminated.
    pub fn render(&self) -> String {
        let mut out = String::from(FRAGMENT_BANNER);
        out.push('\n');
        for (key, value) in &self.entries {
            out.push_str(key);
            out.push('=');
            out.push_str(value);
            out.push('\n');
        }
        out
    }

    /// Write the fragment to `<root>/config.mk`, overwriting any existing file.
    ///
    /// Uses the write-to-temp-then-rename pattern so a crash mid-write never
    /// leaves a truncated fragment behind.
    pub fn write_to(&self, root: &Path) -> Result<PathBuf> {
        let path = root.join(FRAGMENT_FILE);
        let temp_path = path.with_extension("mk.tmp");

        fs::write(&temp_path, self.render()).map_err(|source| RecceError::FragmentWrite {
            path: path.clone(),
            source,
        })?;
        fs::rename(&temp_path, &path).map_err(|source| RecceError::FragmentWrite {
            path: path.clone(),
            source,
        })?;

        Ok(path)
    }
}
