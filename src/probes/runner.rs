//! Bounded execution of version-query commands.
//!
//! Probes invoke candidates like `node --version` to extract a version
//! string. Each invocation is capped by a timeout so one wedged binary
//! cannot stall the whole run; a process that outlives the cap is killed
//! and reported as a timeout, which the caller treats as a rejected
//! candidate.

use std::path::Path;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Default cap on one version-query invocation.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Interval between child liveness polls.
const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Captured output of a version-query invocation.
#[derive(Debug, Clone)]
pub struct VersionCapture {
    /// Standard output, lossily decoded.
    pub stdout: String,
    /// Standard error, lossily decoded.
    pub stderr: String,
    /// Whether the process exited with status 0.
    pub success: bool,
}

impl VersionCapture {
    /// Both streams concatenated.
    ///
    /// Some tools print their version to stderr (Python 2 famously did), so
    /// version extraction scans the combined text.
    pub fn combined(&self) -> String {
        let mut text = self.stdout.clone();
        if !self.stderr.is_empty() {
            if !text.is_empty() && !text.ends_with('\n') {
                text.push('\n');
            }
            text.push_str(&self.stderr);
        }
        text
    }
}

/// Run `exe args…` with both streams captured, bounded by `timeout`.
///
/// Output is read only after the child exits; version banners are far
/// smaller than the pipe buffer, so the child never blocks on a full pipe.
pub fn capture_version_output(
    exe: &Path,
    args: &[String],
    timeout: Duration,
) -> std::io::Result<VersionCapture> {
    let mut child = Command::new(exe)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    let start = Instant::now();
    loop {
        if child.try_wait()?.is_some() {
            break;
        }
        if start.elapsed() >= timeout {
            let _ = child.kill();
            let _ = child.wait();
            return Err(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                format!(
                    "'{}' did not finish within {}s",
                    exe.display(),
                    timeout.as_secs_f32()
                ),
            ));
        }
        std::thread::sleep(POLL_INTERVAL);
    }

    let output = child.wait_with_output()?;
    Ok(VersionCapture {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        success: output.status.success(),
    })
}
