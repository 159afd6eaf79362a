//! The build-configuration orchestrator.
//!
//! [`BuildConfig`] owns the probe registry and the run policy: which
//! features are enabled, where the fragment lands, and how the environment
//! is read. Everything external (environment variables, the search path,
//! the argument vector, the probe timeout) is injectable, so the whole run
//! is drivable from a test without touching process-global state.

use std::collections::HashMap;
use std::env::VarError;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::error::ErrorKind;
use clap::{Arg, ArgAction, ArgMatches, Command};
use tracing::{debug, warn};

use crate::error::{RecceError, Result};
use crate::fragment::ConfigFragment;
use crate::prefix::resolve_prefix;
use crate::probes::runner::DEFAULT_PROBE_TIMEOUT;
use crate::probes::{path_search, ProbeContext, ProbeResult, ToolProbe};
use crate::report::{ProbeOutcome, RunReport, RunStatus};

/// Flag names owned by the orchestrator; probe names may not collide with
/// these since every probe gets its own `--<name>` override flag.
const RESERVED_FLAGS: &[&str] = &["prefix", "json", "quiet", "debug", "help", "version"];

/// Orchestrates probe execution and fragment generation.
///
/// ```no_run
/// use recce::{toolbox, BuildConfig};
///
/// let mut config = BuildConfig::new();
/// config.enable_prefix();
/// config.enable_configmk();
/// config.add_tool(toolbox::yarn());
/// config.add_tool(toolbox::posix("find"));
/// let report = config.run()?;
/// # Ok::<(), recce::RecceError>(())
/// ```
pub struct BuildConfig {
    root: PathBuf,
    prefix_enabled: bool,
    configmk_enabled: bool,
    probes: Vec<Box<dyn ToolProbe>>,
    env_fn: Arc<dyn Fn(&str) -> std::result::Result<String, VarError>>,
    search_path: Option<Vec<PathBuf>>,
    args: Option<Vec<String>>,
    probe_timeout: Duration,
}

impl BuildConfig {
    /// A config with no features enabled and no probes registered, reading
    /// the real process environment and writing to the current directory.
    pub fn new() -> Self {
        Self {
            root: PathBuf::from("."),
            prefix_enabled: false,
            configmk_enabled: false,
            probes: Vec::new(),
            env_fn: Arc::new(|name: &str| std::env::var(name)),
            search_path: None,
            args: None,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }

    /// Directory the fragment is written into.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Replace the environment lookup (for testing).
    pub fn with_env(
        mut self,
        env_fn: impl Fn(&str) -> std::result::Result<String, VarError> + 'static,
    ) -> Self {
        self.env_fn = Arc::new(env_fn);
        self
    }

    /// Replace the executable search path (for testing). Without this the
    /// path comes from the `PATH` variable of the environment lookup.
    pub fn with_search_path(mut self, entries: Vec<PathBuf>) -> Self {
        self.search_path = Some(entries);
        self
    }

    /// Replace the argument vector (for testing). The program name is
    /// supplied internally; pass only the arguments.
    pub fn with_args(mut self, args: Vec<impl Into<String>>) -> Self {
        self.args = Some(args.into_iter().map(Into::into).collect());
        self
    }

    /// Cap on each version-query child process.
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    /// Activate prefix resolution: adds `-p/--prefix` to the CLI and makes
    /// the run honor the `PREFIX` environment variable.
    pub fn enable_prefix(&mut self) -> &mut Self {
        self.prefix_enabled = true;
        self
    }

    /// Activate fragment emission. Without it a run only probes and
    /// reports.
    pub fn enable_configmk(&mut self) -> &mut Self {
        self.configmk_enabled = true;
        self
    }

    /// Register a probe. Registration order is execution order and fragment
    /// order. Registering a second probe under an existing name replaces
    /// the earlier one in place; the later registration wins but keeps the
    /// original position.
    pub fn add_tool(&mut self, probe: impl ToolProbe + 'static) -> &mut Self {
        if let Some(existing) = self.probes.iter_mut().find(|p| p.name() == probe.name()) {
            warn!(tool = %probe.name(), "replacing previously registered tool");
            *existing = Box::new(probe);
        } else {
            self.probes.push(Box::new(probe));
        }
        self
    }

    /// Registered probe names, in execution order.
    pub fn tool_names(&self) -> Vec<&str> {
        self.probes.iter().map(|p| p.name()).collect()
    }

    /// Execute the configured run.
    ///
    /// Parses the CLI, resolves the prefix, runs every probe in
    /// registration order, writes the fragment, prints the summary, and
    /// returns the report. Aborts with [`RecceError::MissingRequiredTool`]
    /// on the first required probe that comes up empty; no fragment is
    /// written on any abort path.
    pub fn run(&self) -> Result<RunReport> {
        self.check_tool_names()?;

        let matches = match self.parse_args() {
            Ok(matches) => matches,
            Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                err.print()?;
                return Ok(RunReport::help_displayed());
            }
            Err(err) => {
                return Err(RecceError::InvalidArguments {
                    message: err.to_string(),
                })
            }
        };

        let json = matches.get_flag("json");
        let quiet = matches.get_flag("quiet");

        let prefix = if self.prefix_enabled {
            let cli_value = matches.get_one::<String>("prefix").map(String::as_str);
            let resolved = resolve_prefix(cli_value, |name| (*self.env_fn)(name))?;
            debug!(prefix = %resolved.path.display(), source = resolved.source.label(), "prefix resolved");
            Some(resolved)
        } else {
            None
        };

        let ctx = self.probe_context(&matches);
        let mut outcomes = Vec::new();
        let mut warnings = Vec::new();
        let mut results = Vec::new();

        for probe in &self.probes {
            let result = probe.detect(&ctx);
            match &result {
                ProbeResult::Found { value } => {
                    debug!(tool = %probe.name(), value = %value, "tool found");
                    outcomes.push(ProbeOutcome::found(probe.name(), probe.required(), value));
                }
                ProbeResult::NotFound if probe.required() => {
                    return Err(RecceError::MissingRequiredTool {
                        tool: probe.name().to_string(),
                        hint: probe.missing_hint(),
                    });
                }
                ProbeResult::NotFound => {
                    warnings.push(format!("{} not found", probe.name()));
                    outcomes.push(ProbeOutcome::missing(probe.name(), probe.required()));
                }
            }
            results.push(result);
        }

        let fragment_path = if self.configmk_enabled {
            let mut fragment = ConfigFragment::new();
            if let Some(prefix) = &prefix {
                fragment.set("prefix", &prefix.path.display().to_string());
            }
            for (probe, result) in self.probes.iter().zip(&results) {
                probe.contribute(result, &mut fragment);
            }
            Some(fragment.write_to(&self.root)?)
        } else {
            None
        };

        let report = RunReport {
            status: RunStatus::Completed,
            prefix,
            tools: outcomes,
            warnings,
            fragment_path,
        };

        if json {
            println!(
                "{}",
                report
                    .to_json()
                    .map_err(|err| RecceError::Other(err.into()))?
            );
        } else {
            report.print_human(quiet);
        }

        Ok(report)
    }

    fn check_tool_names(&self) -> Result<()> {
        for probe in &self.probes {
            if RESERVED_FLAGS.contains(&probe.name()) {
                return Err(RecceError::InvalidArguments {
                    message: format!(
                        "tool name '{}' collides with a built-in flag",
                        probe.name()
                    ),
                });
            }
        }
        Ok(())
    }

    /// Assemble the CLI: base flags plus one `--<name> <EXECUTABLE>`
    /// override per registered probe.
    fn build_command(&self) -> Command {
        let mut command = Command::new("configure")
            .bin_name("./configure")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Probe the build environment and generate config.mk")
            .arg(
                Arg::new("json")
                    .long("json")
                    .action(ArgAction::SetTrue)
                    .help("Print the run report as JSON"),
            )
            .arg(
                Arg::new("quiet")
                    .long("quiet")
                    .action(ArgAction::SetTrue)
                    .help("Suppress summary output"),
            )
            .arg(
                Arg::new("debug")
                    .long("debug")
                    .action(ArgAction::SetTrue)
                    .help("Enable verbose diagnostics on stderr"),
            );

        if self.prefix_enabled {
            command = command.arg(
                Arg::new("prefix")
                    .short('p')
                    .long("prefix")
                    .value_name("DIR")
                    .action(ArgAction::Set)
                    .help("Installation prefix (overridden by the PREFIX environment variable)"),
            );
        }

        for probe in &self.probes {
            let name = probe.name().to_string();
            command = command.arg(
                Arg::new(name.clone())
                    .long(name.clone())
                    .value_name("EXECUTABLE")
                    .action(ArgAction::Set)
                    .help(format!("Use EXECUTABLE as the {name} tool")),
            );
        }

        command
    }

    fn parse_args(&self) -> std::result::Result<ArgMatches, clap::Error> {
        let mut argv = vec!["./configure".to_string()];
        match &self.args {
            Some(args) => argv.extend(args.iter().cloned()),
            None => argv.extend(std::env::args().skip(1)),
        }
        self.build_command().try_get_matches_from(argv)
    }

    fn probe_context(&self, matches: &ArgMatches) -> ProbeContext {
        let path_entries = match &self.search_path {
            Some(entries) => entries.clone(),
            None => path_search::parse_path_entries(|name| (*self.env_fn)(name)),
        };

        let mut overrides = HashMap::new();
        for probe in &self.probes {
            if let Some(value) = matches.get_one::<String>(probe.name()) {
                overrides.insert(probe.name().to_string(), value.clone());
            }
        }

        let env_fn = Arc::clone(&self.env_fn);
        ProbeContext::new(
            path_entries,
            Box::new(move |name| (*env_fn)(name)),
            overrides,
            self.probe_timeout,
        )
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self::new()
    }
}
