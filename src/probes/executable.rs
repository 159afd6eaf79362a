//! Probe for version-checked executables.

use std::path::PathBuf;

use regex::Regex;
use tracing::debug;

use super::{ProbeContext, ProbeResult, ToolProbe};

/// Locates an executable by trying an ordered list of candidate names,
/// optionally validating each hit by running a version query.
///
/// A command line override (`--<name> <path>`) replaces the candidate list
/// with the single override value; validation still applies, so pointing
/// `--yarn` at a cmdtest shim is rejected the same way a PATH hit would be.
pub struct ExecutableProbe {
    name: String,
    candidates: Vec<String>,
    required: bool,
    version_args: Vec<String>,
    min_version: Option<String>,
    impostor_marker: Option<String>,
    hint: Option<String>,
}

impl ExecutableProbe {
    pub fn new(name: impl Into<String>, candidates: &[&str]) -> Self {
        Self {
            name: name.into(),
            candidates: candidates.iter().map(|c| c.to_string()).collect(),
            required: true,
            version_args: Vec::new(),
            min_version: None,
            impostor_marker: None,
            hint: None,
        }
    }

    /// Absence becomes a warning instead of a fatal error.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Arguments used to query a candidate's version, e.g. `--version`.
    /// Without this the probe is a pure presence check.
    pub fn with_version_args(mut self, args: &[&str]) -> Self {
        self.version_args = args.iter().map(|a| a.to_string()).collect();
        self
    }

    /// Reject candidates older than `minimum` (dotted numeric comparison).
    pub fn with_min_version(mut self, minimum: impl Into<String>) -> Self {
        self.min_version = Some(minimum.into());
        self
    }

    /// Reject candidates whose version output contains `marker`. Catches
    /// unrelated binaries installed under the same name, like cmdtest's
    /// `yarn`.
    pub fn with_impostor_marker(mut self, marker: impl Into<String>) -> Self {
        self.impostor_marker = Some(marker.into());
        self
    }

    /// Remediation guidance for the fatal missing-tool message.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Run the version query and apply the validity rules. `None` means the
    /// candidate is rejected.
    fn validate(&self, ctx: &ProbeContext, path: &PathBuf) -> Option<()> {
        if self.version_args.is_empty() {
            return Some(());
        }

        let capture = match ctx.capture(path, &self.version_args) {
            Ok(capture) => capture,
            Err(err) => {
                debug!(tool = %self.name, candidate = %path.display(), error = %err, "version query failed");
                return None;
            }
        };

        let output = capture.combined();

        if let Some(marker) = &self.impostor_marker {
            if output.contains(marker.as_str()) {
                debug!(tool = %self.name, candidate = %path.display(), marker = %marker, "rejecting impostor binary");
                return None;
            }
        }

        if !capture.success {
            debug!(tool = %self.name, candidate = %path.display(), "version query exited nonzero");
            return None;
        }

        let version = extract_version(&output);
        if let Some(version) = &version {
            debug!(tool = %self.name, candidate = %path.display(), version = %version, "version detected");
        }

        if let Some(minimum) = &self.min_version {
            match &version {
                Some(version) if version_at_least(version, minimum) => {}
                Some(version) => {
                    debug!(tool = %self.name, candidate = %path.display(), version = %version, minimum = %minimum, "version below minimum");
                    return None;
                }
                None => {
                    debug!(tool = %self.name, candidate = %path.display(), minimum = %minimum, "no parseable version in output");
                    return None;
                }
            }
        }

        Some(())
    }
}

impl ToolProbe for ExecutableProbe {
    fn name(&self) -> &str {
        &self.name
    }

    fn required(&self) -> bool {
        self.required
    }

    fn missing_hint(&self) -> String {
        match &self.hint {
            Some(hint) => hint.clone(),
            None => format!("install {} and re-run ./configure", self.name),
        }
    }

    fn detect(&self, ctx: &ProbeContext) -> ProbeResult {
        let candidates: Vec<String> = match ctx.override_for(&self.name) {
            Some(value) => vec![value.to_string()],
            None => self.candidates.clone(),
        };

        for candidate in &candidates {
            let Some(path) = ctx.locate(candidate) else {
                debug!(tool = %self.name, candidate = %candidate, "candidate not on search path");
                continue;
            };
            if self.validate(ctx, &path).is_some() {
                return ProbeResult::found(path.display().to_string());
            }
        }

        ProbeResult::NotFound
    }
}

/// Pull a dotted version out of arbitrary version-banner text.
fn extract_version(output: &str) -> Option<String> {
    let patterns = [r"(\d+\.\d+\.\d+)", r"version\s+(\d+\.\d+)", r"v(\d+\.\d+)"];
    for pattern in patterns {
        if let Ok(re) = Regex::new(pattern) {
            if let Some(captures) = re.captures(output) {
                if let Some(matched) = captures.get(1) {
                    return Some(matched.as_str().to_string());
                }
            }
        }
    }
    None
}

/// Numeric comparison of dotted versions; missing components count as zero,
/// trailing non-digits (`18.2.0-nightly`) are ignored.
fn version_at_least(version: &str, minimum: &str) -> bool {
    let components = |text: &str| -> Vec<u64> {
        text.split('.')
            .map(|part| {
                part.chars()
                    .take_while(|c| c.is_ascii_digit())
                    .collect::<String>()
                    .parse()
                    .unwrap_or(0)
            })
            .collect()
    };

    let have = components(version);
    let want = components(minimum);
    for i in 0..have.len().max(want.len()) {
        let h = have.get(i).copied().unwrap_or(0);
        let w = want.get(i).copied().unwrap_or(0);
        if h != w {
            return h > w;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::env::VarError;
    use std::fs;
    use std::path::Path;
    use std::time::Duration;
    use tempfile::TempDir;

    fn fake_tool(dir: &Path, name: &str, script: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{script}\n")).unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        }
        path
    }

    fn context(dirs: Vec<PathBuf>, overrides: HashMap<String, String>) -> ProbeContext {
        ProbeContext::new(
            dirs,
            Box::new(|_| Err(VarError::NotPresent)),
            overrides,
            Duration::from_secs(5),
        )
    }

    #[test]
    fn presence_check_finds_first_candidate() {
        let dir = TempDir::new().unwrap();
        let path = fake_tool(dir.path(), "python3", "exit 0");
        let probe = ExecutableProbe::new("python", &["python3", "python"]);
        let result = probe.detect(&context(vec![dir.path().to_path_buf()], HashMap::new()));
        assert_eq!(result, ProbeResult::found(path.display().to_string()));
    }

    #[test]
    fn presence_check_falls_back_to_later_candidates() {
        let dir = TempDir::new().unwrap();
        let path = fake_tool(dir.path(), "yarnpkg", "exit 0");
        let probe = ExecutableProbe::new("yarn", &["yarn", "yarnpkg"]);
        let result = probe.detect(&context(vec![dir.path().to_path_buf()], HashMap::new()));
        assert_eq!(result, ProbeResult::found(path.display().to_string()));
    }

    #[test]
    fn missing_everywhere_is_not_found() {
        let dir = TempDir::new().unwrap();
        let probe = ExecutableProbe::new("yarn", &["yarn", "yarnpkg"]);
        let result = probe.detect(&context(vec![dir.path().to_path_buf()], HashMap::new()));
        assert_eq!(result, ProbeResult::NotFound);
    }

    #[cfg(unix)]
    #[test]
    fn impostor_marker_rejects_masquerading_binary() {
        let dir = TempDir::new().unwrap();
        fake_tool(
            dir.path(),
            "yarn",
            "echo 'yarn from cmdtest is not the package manager'",
        );
        let real = fake_tool(dir.path(), "yarnpkg", "echo 1.22.19");
        let probe = ExecutableProbe::new("yarn", &["yarn", "yarnpkg"])
            .with_version_args(&["--version"])
            .with_impostor_marker("cmdtest");
        let result = probe.detect(&context(vec![dir.path().to_path_buf()], HashMap::new()));
        assert_eq!(result, ProbeResult::found(real.display().to_string()));
    }

    #[cfg(unix)]
    #[test]
    fn minimum_version_rejects_old_release() {
        let dir = TempDir::new().unwrap();
        fake_tool(dir.path(), "node", "echo v10.24.1");
        let probe = ExecutableProbe::new("node", &["node"])
            .with_version_args(&["--version"])
            .with_min_version("12.0.0");
        let result = probe.detect(&context(vec![dir.path().to_path_buf()], HashMap::new()));
        assert_eq!(result, ProbeResult::NotFound);
    }

    #[cfg(unix)]
    #[test]
    fn minimum_version_accepts_new_release() {
        let dir = TempDir::new().unwrap();
        let path = fake_tool(dir.path(), "node", "echo v18.2.0");
        let probe = ExecutableProbe::new("node", &["node"])
            .with_version_args(&["--version"])
            .with_min_version("12.0.0");
        let result = probe.detect(&context(vec![dir.path().to_path_buf()], HashMap::new()));
        assert_eq!(result, ProbeResult::found(path.display().to_string()));
    }

    #[cfg(unix)]
    #[test]
    fn nonzero_exit_rejects_candidate() {
        let dir = TempDir::new().unwrap();
        fake_tool(dir.path(), "node", "echo v18.2.0; exit 1");
        let probe = ExecutableProbe::new("node", &["node"]).with_version_args(&["--version"]);
        let result = probe.detect(&context(vec![dir.path().to_path_buf()], HashMap::new()));
        assert_eq!(result, ProbeResult::NotFound);
    }

    #[test]
    fn override_replaces_candidate_list() {
        let dir = TempDir::new().unwrap();
        fake_tool(dir.path(), "yarn", "exit 0");
        let pinned = fake_tool(dir.path(), "corp-yarn", "exit 0");
        let mut overrides = HashMap::new();
        overrides.insert("yarn".to_string(), pinned.display().to_string());
        let probe = ExecutableProbe::new("yarn", &["yarn", "yarnpkg"]);
        let result = probe.detect(&context(vec![dir.path().to_path_buf()], overrides));
        assert_eq!(result, ProbeResult::found(pinned.display().to_string()));
    }

    #[test]
    fn bad_override_is_not_rescued_by_candidates() {
        let dir = TempDir::new().unwrap();
        fake_tool(dir.path(), "yarn", "exit 0");
        let mut overrides = HashMap::new();
        overrides.insert("yarn".to_string(), "/nonexistent/bin/yarn".to_string());
        let probe = ExecutableProbe::new("yarn", &["yarn", "yarnpkg"]);
        let result = probe.detect(&context(vec![dir.path().to_path_buf()], overrides));
        assert_eq!(result, ProbeResult::NotFound);
    }

    #[test]
    fn hint_defaults_to_install_advice() {
        let probe = ExecutableProbe::new("yarn", &["yarn"]);
        assert!(probe.missing_hint().contains("install yarn"));
        let hinted = ExecutableProbe::new("yarn", &["yarn"]).with_hint("see https://yarnpkg.com");
        assert_eq!(hinted.missing_hint(), "see https://yarnpkg.com");
    }

    #[test]
    fn extracts_three_component_versions() {
        assert_eq!(
            extract_version("yarn version 1.22.19 linux"),
            Some("1.22.19".to_string())
        );
        assert_eq!(extract_version("v18.2.0"), Some("18.2.0".to_string()));
    }

    #[test]
    fn extracts_two_component_versions() {
        assert_eq!(
            extract_version("tool version 2.7"),
            Some("2.7".to_string())
        );
        assert_eq!(extract_version("v1.9"), Some("1.9".to_string()));
        assert_eq!(extract_version("no digits here"), None);
    }

    #[test]
    fn version_comparison_is_numeric() {
        assert!(version_at_least("12.0.0", "12.0.0"));
        assert!(version_at_least("12.0.1", "12.0.0"));
        assert!(version_at_least("102.0", "99.0"));
        assert!(!version_at_least("9.11.2", "12.0.0"));
        assert!(version_at_least("12.1", "12.0.0"));
        assert!(!version_at_least("11.9.9", "12"));
        assert!(version_at_least("18.2.0-nightly", "18.2.0"));
    }
}
