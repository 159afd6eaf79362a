//! Recce - build-environment reconnaissance for Makefile projects.
//!
//! Recce replaces hand-rolled `./configure` scripts: it probes the system
//! for the external tools a build needs, resolves the installation prefix,
//! and writes the findings to a `config.mk` fragment for `make` to include.
//!
//! # Modules
//!
//! - [`config`] - The [`BuildConfig`] orchestrator driving a whole run
//! - [`error`] - Error types and result aliases
//! - [`fragment`] - The generated `config.mk` fragment
//! - [`prefix`] - Installation-prefix resolution
//! - [`probes`] - The [`probes::ToolProbe`] trait and its variants
//! - [`report`] - Run reports and their terminal/JSON presentation
//! - [`toolbox`] - Built-in probes for the standard toolset
//!
//! # Example
//!
//! ```no_run
//! use recce::{toolbox, BuildConfig};
//!
//! let mut config = BuildConfig::new();
//! config.enable_prefix();
//! config.enable_configmk();
//! config.add_tool(toolbox::yarn());
//! config.add_tool(toolbox::browser());
//! config.add_tool(toolbox::posix("find"));
//! let report = config.run()?;
//! # Ok::<(), recce::RecceError>(())
//! ```

pub mod config;
pub mod error;
pub mod fragment;
pub mod prefix;
pub mod probes;
pub mod report;
pub mod toolbox;

pub use config::BuildConfig;
pub use error::{RecceError, Result};
pub use report::{RunReport, RunStatus};
