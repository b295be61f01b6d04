//! CLI error types for input failures.
//!
//! [`CliError`] covers everything that can go wrong before validation runs:
//! the rules file is missing, unreadable, or not UTF-8. Unlike tools that
//! reserve a separate exit code for input failures, every failure path here
//! exits 1 — a missing rules file blocks deployment exactly like a rule
//! error does, and CI treats both the same. The failure is surfaced as a
//! single error entry in the printed report, not as a bare stderr line.

use std::fmt;
use std::path::PathBuf;

/// All input-failure conditions the `rulelint` CLI can produce.
///
/// [`CliError::message`] returns the human-readable string that becomes the
/// report's single error finding.
#[derive(Debug)]
pub enum CliError {
    /// The rules file could not be found on the filesystem.
    FileNotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// The process lacks permission to read the rules file.
    PermissionDenied {
        /// The path that could not be read.
        path: PathBuf,
    },

    /// The file's bytes are not valid UTF-8.
    InvalidUtf8 {
        /// The path whose contents were rejected.
        path: PathBuf,
    },

    /// A generic I/O error not covered by the variants above.
    IoError {
        /// The path being read.
        path: PathBuf,
        /// The underlying I/O error message.
        detail: String,
    },
}

impl CliError {
    /// Returns the human-readable error message used as the report finding.
    pub fn message(&self) -> String {
        match self {
            Self::FileNotFound { path } => {
                format!("File not found: {}", path.display())
            }
            Self::PermissionDenied { path } => {
                format!("Permission denied: {}", path.display())
            }
            Self::InvalidUtf8 { path } => {
                format!("File is not valid UTF-8: {}", path.display())
            }
            Self::IoError { path, detail } => {
                format!("I/O error reading {}: {detail}", path.display())
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for CliError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
