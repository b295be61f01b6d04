//! Rules-file reading.
//!
//! This module is the single entry point for input I/O in the `rulelint`
//! binary. `rulelint-core` never touches the filesystem; all reading happens
//! here, and every failure is converted to a [`CliError`] whose message
//! becomes the report's single error finding.

use std::path::Path;

use crate::error::CliError;

/// Reads the entire rules document at `path` into a `String`.
///
/// # Errors
///
/// Returns [`CliError`] for:
/// - file not found
/// - permission denied
/// - invalid UTF-8
/// - any other I/O error
pub fn read_rules(path: &Path) -> Result<String, CliError> {
    let bytes = std::fs::read(path).map_err(|e| io_error_to_cli(&e, path))?;
    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(_) => Err(CliError::InvalidUtf8 {
            path: path.to_path_buf(),
        }),
    }
}

/// Maps a `std::io::Error` from a read to a [`CliError`].
fn io_error_to_cli(e: &std::io::Error, path: &Path) -> CliError {
    match e.kind() {
        std::io::ErrorKind::NotFound => CliError::FileNotFound {
            path: path.to_path_buf(),
        },
        std::io::ErrorKind::PermissionDenied => CliError::PermissionDenied {
            path: path.to_path_buf(),
        },
        // All other I/O error kinds are wrapped in the generic IoError variant.
        // A few common ones are listed explicitly to silence the
        // exhaustiveness lint while still routing everything unknown there.
        std::io::ErrorKind::IsADirectory
        | std::io::ErrorKind::InvalidInput
        | std::io::ErrorKind::InvalidData
        | std::io::ErrorKind::TimedOut
        | std::io::ErrorKind::Interrupted
        | std::io::ErrorKind::UnexpectedEof
        | std::io::ErrorKind::OutOfMemory
        | std::io::ErrorKind::Other
        | _ => CliError::IoError {
            path: path.to_path_buf(),
            detail: e.to_string(),
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
