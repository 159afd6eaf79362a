//! Error types for recce operations.
//!
//! This module defines [`RecceError`], the primary error type used throughout
//! the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `RecceError` for domain-specific errors that need distinct handling
//! - Use `anyhow::Error` (via `RecceError::Other`) for unexpected errors
//! - Probe-level execution failures (spawn errors, timeouts, garbage version
//!   output) are not errors at this level: they reject a candidate and
//!   surface as `NotFound`, escalating only through the required-tool path
//! - All fatal errors should carry an actionable message for users

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for recce operations.
#[derive(Debug, Error)]
pub enum RecceError {
    /// A required tool could not be found on the system.
    #[error("Required tool '{tool}' not found: {hint}")]
    MissingRequiredTool { tool: String, hint: String },

    /// The supplied installation prefix is structurally invalid.
    #[error("Invalid prefix '{value}': {message}")]
    InvalidPrefix { value: String, message: String },

    /// Command-line parsing failed.
    #[error("{message}")]
    InvalidArguments { message: String },

    /// Writing the generated fragment failed.
    #[error("Failed to write {path}: {source}")]
    FragmentWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RecceError {
    /// Process exit code for this error.
    ///
    /// CLI parse failures use 2 (clap's convention); everything else is 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            RecceError::InvalidArguments { .. } => 2,
            _ => 1,
        }
    }
}

/// Result type alias for recce operations.
pub type Result<T> = std::result::Result<T, RecceError>;
