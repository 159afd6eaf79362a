//! Built-in probes for the standard toolset.
//!
//! These mirror the tools the web frontends need at build time. Callers
//! embedding the framework can register any [`ToolProbe`] implementation;
//! the stock binary registers exactly these.
//!
//! [`ToolProbe`]: crate::probes::ToolProbe

use crate::probes::{BrowserProbe, ExecutableProbe, LocalizationProbe, PosixProbe};

/// Oldest Node.js release the frontend toolchain supports.
pub const NODE_MIN_VERSION: &str = "12.0.0";

/// Substring identifying the unrelated `yarn` binary shipped by Debian's
/// cmdtest package.
pub const YARN_IMPOSTOR_MARKER: &str = "cmdtest";

/// The yarn package manager, also installed as `yarnpkg` on Debian.
pub fn yarn() -> ExecutableProbe {
    ExecutableProbe::new("yarn", &["yarn", "yarnpkg"])
        .with_version_args(&["--version"])
        .with_impostor_marker(YARN_IMPOSTOR_MARKER)
        .with_hint(
            "install yarn from https://yarnpkg.com (Debian's cmdtest package \
             ships an unrelated 'yarn' binary, which will not do)",
        )
}

/// The Node.js runtime, at least [`NODE_MIN_VERSION`].
pub fn node() -> ExecutableProbe {
    ExecutableProbe::new("node", &["node", "nodejs"])
        .with_version_args(&["--version"])
        .with_min_version(NODE_MIN_VERSION)
        .with_hint(format!(
            "install node >= {NODE_MIN_VERSION} from your distribution or https://nodejs.org"
        ))
}

/// A Python 3 interpreter.
pub fn python() -> ExecutableProbe {
    ExecutableProbe::new("python", &["python3", "python"]).with_hint("install python 3")
}

/// Babel's message extraction CLI, bare or interpreter-suffixed.
pub fn pybabel() -> LocalizationProbe {
    LocalizationProbe::new("pybabel", "pybabel")
}

/// The browser used for post-install smoke checks.
pub fn browser() -> BrowserProbe {
    BrowserProbe::new()
}

/// One POSIX utility, by name.
pub fn posix(name: &str) -> PosixProbe {
    PosixProbe::new(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probes::ToolProbe;

    #[test]
    fn yarn_is_required() {
        let probe = yarn();
        assert_eq!(probe.name(), "yarn");
        assert!(probe.required());
        assert!(probe.missing_hint().contains("yarnpkg.com"));
    }

    #[test]
    fn node_is_required() {
        let probe = node();
        assert_eq!(probe.name(), "node");
        assert!(probe.required());
        assert!(probe.missing_hint().contains(NODE_MIN_VERSION));
    }

    #[test]
    fn python_is_required() {
        let probe = python();
        assert_eq!(probe.name(), "python");
        assert!(probe.required());
    }

    #[test]
    fn auxiliary_tools_are_optional() {
        assert!(!pybabel().required());
        assert!(!browser().required());
        assert!(!posix("find").required());
    }

    #[test]
    fn posix_probe_takes_its_utility_name() {
        assert_eq!(posix("msgmerge").name(), "msgmerge");
        assert_eq!(posix("xargs").name(), "xargs");
    }
}
